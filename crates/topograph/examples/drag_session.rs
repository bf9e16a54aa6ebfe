//! Example: Driving a viewer like an interactive host
//!
//! This example builds the office network, runs frames until the layout
//! settles, drags the server across the canvas and lets it settle again,
//! then writes the result to `drag_session.svg`.

use topograph::{
    builtin,
    config::AppConfig,
    export::svg::SvgExporter,
    geometry::Point,
    icons::InlineIcons,
    identifier::Id,
    render::Viewer,
};

fn run_until_settled(viewer: &mut Viewer) -> usize {
    let mut frames = 0;
    while viewer.on_frame() {
        frames += 1;
    }
    frames
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::default();
    let topology = builtin::office_network()?;
    let icons = InlineIcons::from_topology(&topology);
    let mut viewer = Viewer::new(topology, &icons, &config)?;

    let frames = run_until_settled(&mut viewer);
    println!("Initial layout settled after {frames} frames");

    // Pointer-down on the server's sprite
    let server = Id::new("C");
    let start = viewer.position(server).ok_or("server is missing")?;
    let picked = viewer.node_at(start).ok_or("nothing under the pointer")?;
    println!("Picked node {picked} at ({:.1}, {:.1})", start.x(), start.y());

    // Drag it in small steps toward the top-left corner
    viewer.drag_start(picked)?;
    let target = Point::new(300.0, 200.0);
    for step in 1..=60 {
        let t = step as f32 / 60.0;
        let pointer = start.add_point(target.sub_point(start).scale(t));
        viewer.drag_move(picked, pointer)?;
        viewer.on_frame();
    }
    viewer.drag_end(picked)?;

    let frames = run_until_settled(&mut viewer);
    let end = viewer.position(picked).ok_or("server is missing")?;
    println!(
        "Released; settled again after {frames} frames at ({:.1}, {:.1})",
        end.x(),
        end.y()
    );

    let scene = viewer.scene().ok_or("viewer is closed")?;
    SvgExporter::from_config(&config)?.write(scene, "drag_session.svg")?;
    println!("Wrote drag_session.svg");

    viewer.close();
    Ok(())
}
