/// Terminal front end: folds nets of solids as colored ASCII
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use netfold_core::layout::OPPOSITE_FACE_RULES;
use netfold_core::{
    Camera, ControlMode, HollowScene, Layout, PointerEvent, PointerKind, PointerSource, Progress, Rgb, Session,
    Transform,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Screen pixels one terminal row stands for when mapping mouse drags, so a
/// full 200 px traversal takes about ten rows.
pub const ROW_PIXELS: f32 = 20.0;
/// Terminal cells are roughly twice as tall as they are wide.
pub const COLUMN_PIXELS: f32 = 10.0;

const NEW_FACE: Rgb = Rgb::hex(0xEF4444);
const OLD_FACE: Rgb = Rgb::hex(0x3B82F6);
const OUTER_FACE: Rgb = Rgb::hex(0x94A3B8);

/// Rows reserved above the 3D view for the information panel.
const HEADER_ROWS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Nets,
    Hollow,
}

/// Maps a crossterm mouse event onto a pointer sample.
pub fn pointer_from_mouse(event: &MouseEvent) -> Option<PointerEvent> {
    let kind = match event.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerKind::Start,
        MouseEventKind::Drag(MouseButton::Left) => PointerKind::Move,
        MouseEventKind::Up(MouseButton::Left) => PointerKind::End,
        _ => return None,
    };
    Some(PointerEvent {
        kind,
        x: event.column as f32 * COLUMN_PIXELS,
        y: event.row as f32 * ROW_PIXELS,
        source: PointerSource::Mouse,
    })
}

/// `[#####.....]  50%`
pub fn progress_bar(progress: Progress, width: usize) -> String {
    let filled = (progress.value() * width as f32).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        ".".repeat(width - filled),
        progress.value() * 100.0
    )
}

/// Information panel lines for a layout.
pub fn layout_info(layout: &Layout) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(family) = layout.family() {
        lines.push(format!("family {family} ({} nets)", family.variants()));
    }
    lines.extend(layout.notes().iter().cloned());
    if let Some(grid) = layout.grid() {
        lines.extend(grid.to_string().lines().map(|row| format!("  {row}")));
    }
    let pairs = layout.opposite_pairs();
    if !pairs.is_empty() {
        let pairs: Vec<_> = pairs.iter().map(|(a, b)| format!("{a}<->{b}")).collect();
        lines.push(format!("opposite faces: {}", pairs.join("  ")));
        lines.push(OPPOSITE_FACE_RULES[0].to_string());
    }
    lines.extend(layout.solid().formulas().iter().map(|f| f.to_string()));
    lines.push(format!("surface area = {:.2}", layout.surface_area()));
    lines
}

/// Main application struct for terminal net folding
pub struct TerminalApp {
    session: Session,
    hollow: HollowScene,
    view: View,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
    show_info: bool,
    last_tick: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(session: Session, hollow: HollowScene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let rows = height.saturating_sub(HEADER_ROWS);

        let mut app = Self {
            session,
            hollow,
            view: View::Nets,
            camera: Camera::new(width as u32, rows as u32),
            renderer: AsciiRenderer::new(width as usize, rows as usize),
            running: true,
            show_info: true,
            last_tick: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.fit_viewport(width, rows);
        app.frame_scene();
        Ok(app)
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.update();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn fit_viewport(&mut self, width: u16, rows: u16) {
        self.renderer.resize(width as usize, rows as usize);
        self.camera.set_viewport(width as u32, rows as u32);
        // Correct for tall cells.
        self.camera.aspect *= COLUMN_PIXELS / ROW_PIXELS;
    }

    fn frame_scene(&mut self) {
        let radius = match self.view {
            View::Nets => {
                let layout = self.session.layout();
                layout
                    .faces()
                    .iter()
                    .flat_map(|f| [f.folded(), f.unfolded()].map(|p| p.position.norm() + f.panel().extent()))
                    .fold(1.0, f32::max)
            }
            View::Hollow => {
                let cube = self.hollow.cube();
                cube.side() + netfold_core::hollow::EXTRACT_OFFSET[0]
            }
        };
        self.camera.frame_radius(radius);
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(&mouse),
            Event::Resize(width, height) => self.fit_viewport(width, height.saturating_sub(HEADER_ROWS)),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.camera.zoom(0.9),
            MouseEventKind::ScrollDown => self.camera.zoom(1.1),
            _ if self.view == View::Nets => {
                if let Some(pointer) = pointer_from_mouse(mouse) {
                    let updates = self.session.pointer(&pointer);
                    debug!(updates = updates.len(), "pointer");
                }
            }
            _ => {}
        }
    }

    /// Drags by `rows` terminal rows from the middle of the screen, for
    /// keyboard users.
    fn keyboard_drag(&mut self, rows: f32) {
        let y = self.renderer.height() as f32 * ROW_PIXELS / 2.0;
        for event in [
            PointerEvent::start(0.0, y),
            PointerEvent::moved(0.0, y - rows * ROW_PIXELS),
            PointerEvent::end(0.0, y - rows * ROW_PIXELS),
        ] {
            self.session.pointer(&event);
        }
    }

    fn handle_key(&mut self, KeyEvent { code, .. }: KeyEvent) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => self.camera.orbit(0.0, 0.1),
            KeyCode::Char('s') | KeyCode::Down => self.camera.orbit(0.0, -0.1),
            KeyCode::Char('a') | KeyCode::Left => self.camera.orbit(-0.1, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.camera.orbit(0.1, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom(0.9),
            KeyCode::Char('-') => self.camera.zoom(1.1),
            KeyCode::Char('i') => self.show_info = !self.show_info,
            KeyCode::Tab => {
                self.view = match self.view {
                    View::Nets => View::Hollow,
                    View::Hollow => View::Nets,
                };
                info!(view = ?self.view, "view switched");
                self.frame_scene();
            }
            _ if self.view == View::Hollow => self.handle_hollow_key(code),
            _ => self.handle_net_key(code),
        }
    }

    fn handle_net_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('n') | KeyCode::PageDown => {
                self.session.cycle(1);
                self.frame_scene();
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                self.session.cycle(-1);
                self.frame_scene();
            }
            KeyCode::Char(' ') => {
                self.session.toggle();
            }
            KeyCode::Char('f') => {
                self.session.set_folded(true);
            }
            KeyCode::Char('u') => {
                self.session.set_folded(false);
            }
            KeyCode::Char('k') => self.keyboard_drag(1.0),
            KeyCode::Char('j') => self.keyboard_drag(-1.0),
            _ => {}
        }
    }

    fn handle_hollow_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('c') | KeyCode::Char('n') => {
                let next = self.hollow.case().next();
                self.hollow.set_case(next);
            }
            KeyCode::Char('x') | KeyCode::Char(' ') => self.hollow.toggle_extracted(),
            _ => {}
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_tick;
        self.last_tick = now;

        let moved = self.session.tick(dt);
        if !moved.is_empty() {
            debug!(faces = moved.len(), progress = self.session.progress().value(), "tick");
        }
        self.hollow.tick(dt);
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        match self.view {
            View::Nets => self.render_nets(),
            View::Hollow => self.render_hollow(),
        }

        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;
        self.renderer.draw(&mut stdout, HEADER_ROWS)?;

        let header = self.header();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(&header[0]),
            cursor::MoveTo(0, 1),
            SetForegroundColor(Color::Grey),
            Print(&header[1]),
            ResetColor
        )?;

        if self.show_info {
            for (row, line) in (HEADER_ROWS + 1..).zip(self.info_lines()) {
                queue!(
                    stdout,
                    cursor::MoveTo(1, row),
                    SetForegroundColor(Color::White),
                    Print(line),
                    ResetColor
                )?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn render_nets(&mut self) {
        let layout = self.session.layout();
        let unroll = self.session.progress().value();
        for (i, face) in layout.faces().iter().enumerate() {
            let Some(pose) = self.session.displayed_pose(i) else {
                continue;
            };
            let model = Transform::model_matrix(pose);
            let mesh = face.panel().mesh(unroll);
            self.renderer.render_mesh(&mesh, &model, &self.camera, face.color());
        }
    }

    fn render_hollow(&mut self) {
        for tile in self.hollow.surface_tiles() {
            let mesh = netfold_core::Mesh::square(tile.edge);
            let model = Transform::model_matrix(&tile.pose);
            self.renderer.render_mesh(&mesh, &model, &self.camera, OUTER_FACE);
        }

        let sub_side = self.hollow.cube().sub_side();
        let mesh = netfold_core::Mesh::square(sub_side);
        for wall in self.hollow.hole_walls() {
            let model = Transform::model_matrix(&wall.pose);
            self.renderer.render_mesh(&mesh, &model, &self.camera, NEW_FACE);
        }
        for face in self.hollow.sub_cube_faces() {
            let model = Transform::model_matrix(&face.pose);
            let color = if face.original { OLD_FACE } else { NEW_FACE };
            self.renderer.render_mesh(&mesh, &model, &self.camera, color);
        }
    }

    fn header(&self) -> [String; 2] {
        match self.view {
            View::Nets => {
                let layout = self.session.layout();
                let controls = match layout.mode() {
                    ControlMode::Drag => "drag mouse / j k = fold",
                    ControlMode::Toggle => "space = toggle  f/u = fold/unfold",
                };
                [
                    format!(
                        "Netfold | {} ({}/{}) | {} | FPS: {:.1}",
                        layout.name(),
                        self.session.active_index() + 1,
                        self.session.registry().len(),
                        progress_bar(self.session.progress(), 20),
                        self.fps
                    ),
                    format!("{controls}  n/p = layout  arrows = orbit  +/- = zoom  tab = hollow cube  i = info  q = quit"),
                ]
            }
            View::Hollow => [
                format!(
                    "Netfold | hollow cube: {} | extracted: {} | FPS: {:.1}",
                    self.hollow.case(),
                    self.hollow.is_extracted(),
                    self.fps
                ),
                "c = next case  x = extract  arrows = orbit  +/- = zoom  tab = nets  i = info  q = quit".to_string(),
            ],
        }
    }

    fn info_lines(&self) -> Vec<String> {
        match self.view {
            View::Nets => layout_info(self.session.layout()),
            View::Hollow => {
                let report = self.hollow.report();
                vec![
                    report.description,
                    report.detail,
                    report.formula,
                    format!("outer faces removed: -{}", report.removed),
                    format!("inner faces added:   +{}", report.added),
                    format!("area change: {:+}", report.delta),
                ]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use netfold_core::LayoutRegistry;

    #[test]
    fn test_pointer_from_mouse() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 4,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        let pointer = pointer_from_mouse(&mouse).unwrap();
        assert_eq!(pointer.kind, PointerKind::Move);
        assert_eq!(pointer.y, 3.0 * ROW_PIXELS);

        let right = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            ..mouse
        };
        assert!(pointer_from_mouse(&right).is_none());
    }

    #[test]
    fn test_ten_rows_unfold_fully() {
        assert_eq!(10.0 * ROW_PIXELS, netfold_core::config::DEFAULT_DRAG_SCALE);
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(Progress::new(0.5), 10), "[#####.....]  50%");
        assert_eq!(progress_bar(Progress::UNFOLDED, 4), "[####] 100%");
    }

    #[test]
    fn test_layout_info_lists_opposites_and_grid() {
        let registry = LayoutRegistry::builtin();
        let lines = layout_info(registry.get_layout("cube/141-1").unwrap());
        assert!(lines.iter().any(|l| l.starts_with("family 1-4-1")));
        assert!(lines.iter().any(|l| l == "  2345"));
        assert!(lines.iter().any(|l| l.starts_with("opposite faces:")));
    }
}
