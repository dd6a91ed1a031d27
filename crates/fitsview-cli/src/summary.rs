use std::path::Path;

use console::Style;
use fitsview_core::render::Raster;
use fitsview_core::session::Session;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_render_summary(session: &Session, raster: &Raster, output: &Path) {
    let s = Styles::new();
    let state = session.state();
    let image = state.image();

    println!();
    println!("  {}", s.title.apply_to(session.title()));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(session.title().chars().count())));
    println!();

    if let Some(ref input) = image.metadata.filename {
        println!("  {:<14}{}", s.label.apply_to("Input"), s.path.apply_to(input.display()));
    }
    println!("  {:<14}{}", s.label.apply_to("Output"), s.path.apply_to(output.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Image"),
        s.value.apply_to(format!("{}x{}", image.width(), image.height()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Raster"),
        s.value.apply_to(format!("{}x{}", raster.width(), raster.height()))
    );
    println!();

    println!("  {}", s.header.apply_to("View"));
    let (cx, cy) = state.pan_center();
    println!(
        "    {:<12}{}",
        s.label.apply_to("Zoom"),
        s.value.apply_to(format!("{:.3}x", state.zoom()))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Center"),
        s.value.apply_to(format!("({cx:.1}, {cy:.1})"))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Origin"),
        s.method.apply_to(format!("{:?}", state.origin()).to_lowercase())
    );
    println!();

    println!("  {}", s.header.apply_to("Intensity"));
    println!("    {:<12}{}", s.label.apply_to("Stretch"), s.method.apply_to(state.stretch()));
    println!("    {:<12}{}", s.label.apply_to("Palette"), s.method.apply_to(state.palette()));
    println!("    {:<12}{}", s.label.apply_to("Contrast"), s.value.apply_to(state.contrast()));
    match raster.limits() {
        Some(limits) => {
            let mode = if limits.auto { "auto" } else { "fixed" };
            println!(
                "    {:<12}{} {}",
                s.label.apply_to("Limits"),
                s.value.apply_to(format!("{:.6} .. {:.6}", limits.vmin, limits.vmax)),
                s.disabled.apply_to(format!("({mode})"))
            );
        }
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Limits"),
            s.disabled.apply_to("no finite pixels visible")
        ),
    }
    if state.invert() {
        println!("    {:<12}{}", s.label.apply_to("Invert"), s.value.apply_to("yes"));
    }
    println!();

    println!("  {}", s.header.apply_to("Layers"));
    println!("    {:<12}{}", s.label.apply_to("Plot"), s.method.apply_to(state.plot_type()));
    match raster.contours() {
        Some(overlay) => {
            let levels = match state.contour_levels() {
                Some(levels) => format!("{} explicit", levels.len()),
                None => "auto".to_string(),
            };
            println!(
                "    {:<12}{} {}",
                s.label.apply_to("Contours"),
                s.value.apply_to(format!("{} segments", overlay.segments.len())),
                s.disabled.apply_to(format!("({levels} levels)"))
            );
        }
        None => println!("    {:<12}{}", s.label.apply_to("Contours"), s.disabled.apply_to("off")),
    }
    println!();
}
