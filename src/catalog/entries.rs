//! Formula data for the standard catalog.
//!
//! Economic-thickness formulas follow the revision that uses the
//! fluid-to-ambient difference `(Ti - Ta)`; see DESIGN.md for the open
//! question around `(Ti - Te)`.

use super::FormulaSpec;

/// Free-convection guard for interior surfaces in the laminar range.
const INTERIOR_LAMINAR: &[&str] = &["H**3 * (Te - Ta) <= 10", "Te - Ta <= 100", "H > 0"];

pub(super) fn standard() -> Vec<FormulaSpec> {
    vec![
        FormulaSpec::bare(
            "economic_thickness_flat",
            "(e + k/h)**2 == (((Ti - Ta) * k * w * beta * life * eta) / C) * 10**-3",
            "e",
        )
        .with_convection(),
        FormulaSpec::bare(
            "economic_thickness_cylinder",
            "((e + r) * (h * (e + r) * log((e + r)/r) + k)**2) / (h * k * (h * (e + r) - k)) \
             == (((Ti - Ta) * beta * life * w * eta) / C) * 10**-3",
            "e",
        )
        .numeric_only()
        .with_convection(),
        FormulaSpec::bare(
            "economic_thickness_sphere",
            "((e + r) * (h * (e + r)**2 - h * r * (e + r) + k * r)**2) \
             / ((e + r)**2 * h * k * (h * (e + r) - 2 * k)) \
             == (((Ti - Ta) * beta * w * life * eta) / C) * 10**-3",
            "e",
        )
        .numeric_only()
        .with_convection(),
        FormulaSpec::bare("critical_thickness_flat", "e_c == k / h", "e_c"),
        FormulaSpec::bare("critical_radius_cylinder", "r_c == k / h", "r_c"),
        FormulaSpec::bare("critical_radius_sphere", "r_c == 2 * k / h", "r_c"),
        FormulaSpec::guarded(
            "conv_interior_vertical_laminar",
            "h == 1.32 * ((Te - Ta) / H)**0.25",
            INTERIOR_LAMINAR,
            "h",
        ),
        FormulaSpec::guarded(
            "conv_interior_vertical_turbulent",
            "h == 1.74 * (Te - Ta)**(1/3)",
            &["H**3 * (Te - Ta) >= 10", "Te - Ta <= 100", "H > 0"],
            "h",
        ),
        FormulaSpec::guarded(
            "conv_interior_horizontal_laminar",
            "h == 1.25 * ((Te - Ta) / H)**0.25",
            INTERIOR_LAMINAR,
            "h",
        ),
        FormulaSpec::guarded(
            "conv_interior_horizontal_turbulent",
            "h == 1.21 * (Te - Ta)**(1/3)",
            &["H**3 * (Te - Ta) > 10", "Te - Ta <= 100", "H > 0"],
            "h",
        ),
        FormulaSpec::guarded(
            "conv_exterior_vertical_laminar",
            "h == 3.96 * (v / H)**0.5",
            &["v * H <= 8", "v > 0", "H > 0"],
            "h",
        ),
        FormulaSpec::guarded(
            "conv_exterior_vertical_turbulent",
            "h == 5.76 * (v**4 / H)**0.5",
            &["v * H > 8", "v > 0", "H > 0"],
            "h",
        ),
        FormulaSpec::guarded(
            "conv_exterior_horizontal_laminar",
            "h == (8.1 * 10**-3) / H + 3.14 * (v / H)**0.5",
            &["v * H <= 8.55", "v > 0", "H > 0"],
            "h",
        ),
        FormulaSpec::guarded(
            "conv_exterior_horizontal_turbulent",
            "h == 8.9 * v**0.9 / H**0.1",
            &["v * H > 8.55", "v > 0", "H > 0"],
            "h",
        ),
    ]
}

pub(super) const LEGEND: &[(&str, &str)] = &[
    ("e", "Insulation thickness (m)"),
    ("e_c", "Critical insulation thickness (m)"),
    ("k", "Thermal conductivity of the insulating material (W/m°C)"),
    ("w", "Energy or fuel cost ($/kWh)"),
    ("beta", "Operating hours per year (h/year)"),
    ("life", "Service life of the installation (years)"),
    ("C", "Installed insulation cost per unit volume ($/m³)"),
    ("h", "Convective heat transfer coefficient (W/m²K)"),
    ("Ti", "Hot fluid or inner surface temperature (°C)"),
    ("Te", "Outer insulation surface temperature (°C)"),
    ("Ta", "Ambient temperature (°C)"),
    ("eta", "Heat generation efficiency (fraction)"),
    ("r", "Inner insulation radius for cylinders and spheres (m)"),
    ("r_c", "Critical insulation radius (m)"),
    ("diameter", "Outer pipe or vessel diameter (m)"),
    ("H", "Characteristic dimension: height for plates, diameter for cylinders and spheres (m)"),
    ("v", "Air or wind velocity (m/s)"),
];
