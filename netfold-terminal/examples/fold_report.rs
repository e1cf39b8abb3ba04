/// Example: Print the layout catalog and a scripted fold without a terminal UI
///
/// Usage: cargo run --example fold_report -- [layout-id]
use netfold_core::{HollowCase, HollowCube, PointerEvent, Session, UnfoldConfig};
use netfold_terminal::{layout_info, progress_bar};
use std::env;
use std::io;
use std::time::Duration;

fn main() -> io::Result<()> {
    let mut session = Session::with_builtin(UnfoldConfig::default())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if let Some(id) = env::args().nth(1) {
        session
            .select(&id)
            .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    }

    let layout = session.layout();
    println!("{} [{}]", layout.name(), layout.id());
    for line in layout_info(layout) {
        println!("  {line}");
    }

    // Drag down in 50 px steps, then back up, printing progress as we go.
    session.pointer(&PointerEvent::start(0.0, 0.0));
    for y in (0..=400).step_by(50).chain((0..400).step_by(50).rev()) {
        let updates = session.pointer(&PointerEvent::moved(0.0, y as f32));
        println!("y = {y:>4}  {}  ({} faces moved)", progress_bar(session.progress(), 20), updates.len());
    }
    session.pointer(&PointerEvent::end(0.0, 0.0));

    // Toggle layouts animate instead; sample the transition at 100 ms steps.
    if session.toggle().is_empty() && session.is_animating() {
        while session.is_animating() {
            let moved = session.tick(Duration::from_millis(100));
            if let Some(first) = moved.first() {
                println!("face {} at {:?}", first.id, first.position);
            }
        }
    }

    let cube = HollowCube::default();
    println!("\nhollow cube, side {} with a {} sub-cube:", cube.side(), cube.sub_side());
    for case in HollowCase::ALL {
        let report = cube.report(case);
        println!("  {:<7} {:<28} {}", case.name(), report.formula, report.description);
    }

    Ok(())
}
