/// Netfold Terminal - fold and unfold nets of solids
///
/// Controls:
///   - Mouse drag / J K: Fold and unfold drag layouts
///   - Space / F / U: Toggle, fold or unfold the cross demo
///   - N / P: Next / previous layout
///   - WASD / Arrow Keys: Orbit the camera, +/- or wheel to zoom
///   - Tab: Switch to the hollow-cube demo (C = next case, X = extract)
///   - Q/ESC: Quit
use clap::Parser;
use netfold_core::hollow::{DEFAULT_CUBE_SIDE, DEFAULT_SUB_SIDE};
use netfold_core::{HollowCube, HollowScene, LayoutRegistry, NetfoldError, Session, SolidKind, UnfoldConfig};
use netfold_terminal::TerminalApp;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "netfold-terminal", version, about = "Fold and unfold nets of solids in the terminal")]
struct Args {
    /// Layout to start with
    #[arg(short, long, default_value = netfold_core::session::DEFAULT_LAYOUT)]
    layout: String,

    /// Pixels of vertical drag for a full fold or unfold
    #[arg(long, default_value_t = netfold_core::config::DEFAULT_DRAG_SCALE)]
    drag_scale: f32,

    /// Length of the toggle transition in milliseconds
    #[arg(long, default_value_t = 1200)]
    toggle_ms: u64,

    /// Smoothing applied to drag updates in milliseconds
    #[arg(long, default_value_t = 0)]
    smoothing_ms: u64,

    /// Side of the hollow-cube demo's outer cube
    #[arg(long, default_value_t = DEFAULT_CUBE_SIDE)]
    cube_side: f32,

    /// Side of the sub-cube cut out of it
    #[arg(long, default_value_t = DEFAULT_SUB_SIDE)]
    sub_side: f32,

    /// Write logs to this file; filter them with NETFOLD_LOG
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the layout catalog and exit
    #[arg(long)]
    list: bool,
}

fn init_logging(path: &PathBuf) -> io::Result<()> {
    let file = File::create(path)?;
    let env_filter = EnvFilter::try_from_env("NETFOLD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn to_io(err: NetfoldError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

fn list_layouts(registry: &LayoutRegistry) {
    for solid in SolidKind::ALL {
        println!("{}:", solid.name());
        for layout in registry.list_layouts(solid) {
            println!("  {:<14} {} ({:?})", layout.id(), layout.name(), layout.mode());
        }
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    // The terminal belongs to the renderer, so logs only go to a file.
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let registry = LayoutRegistry::try_builtin().map_err(|e| to_io(e.into()))?;
    if args.list {
        list_layouts(&registry);
        return Ok(());
    }

    let config = UnfoldConfig::default()
        .with_drag_scale(args.drag_scale)
        .with_toggle_duration(Duration::from_millis(args.toggle_ms))
        .with_drag_smoothing(Duration::from_millis(args.smoothing_ms));
    let session = Session::new(registry, config, &args.layout).map_err(to_io)?;
    let cube = HollowCube::new(args.cube_side, args.sub_side).map_err(|e| to_io(e.into()))?;
    let hollow = HollowScene::new(cube, config.toggle_duration);

    info!(layout = %args.layout, ?config, "starting terminal front end");

    let mut app = TerminalApp::new(session, hollow)?;
    app.run()?;

    println!("Thank you for using Netfold!");
    Ok(())
}
