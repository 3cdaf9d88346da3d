//! Scripted gesture scenarios for the floating launcher.
//!
//! Each scenario drives a headless launcher through the robot harness and
//! summarises what a user would have seen.

use anyhow::{anyhow, bail, Context};
use snapdock_geometry::Point;
use snapdock_launcher::{
    ChatBackend, ChatError, ChatMessage, ChatReply, ChatRequest, ChatSurface, GesturePhase,
    LauncherSettings, PresentationState, SnapSide, Viewport,
};
use snapdock_testing::LauncherRobot;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    Tap,
    DragLeft,
    DragRight,
    FlingUp,
    Interrupt,
    Rotate,
    Chat,
    All,
}

impl Scenario {
    const EACH: [Scenario; 7] = [
        Scenario::Tap,
        Scenario::DragLeft,
        Scenario::DragRight,
        Scenario::FlingUp,
        Scenario::Interrupt,
        Scenario::Rotate,
        Scenario::Chat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Tap => "tap",
            Scenario::DragLeft => "drag-left",
            Scenario::DragRight => "drag-right",
            Scenario::FlingUp => "fling-up",
            Scenario::Interrupt => "interrupt",
            Scenario::Rotate => "rotate",
            Scenario::Chat => "chat",
            Scenario::All => "all",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::EACH
            .into_iter()
            .chain([Scenario::All])
            .find(|scenario| scenario.name() == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    pub width: f32,
    pub height: f32,
    pub scenario: Scenario,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 800.0,
            scenario: Scenario::All,
        }
    }
}

impl SimOptions {
    pub fn from_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || {
                args.next()
                    .ok_or_else(|| anyhow!("{flag} expects a value"))
            };
            match flag.as_str() {
                "--width" => options.width = parse_length(&value()?).context("--width")?,
                "--height" => options.height = parse_length(&value()?).context("--height")?,
                "--scenario" => {
                    let name = value()?;
                    options.scenario = Scenario::parse(&name)
                        .ok_or_else(|| anyhow!("unknown scenario {name:?}"))?;
                }
                other => bail!("unrecognised argument {other:?}"),
            }
        }
        Ok(options)
    }
}

fn parse_length(raw: &str) -> anyhow::Result<f32> {
    let value: f32 = raw.parse().with_context(|| format!("{raw:?} is not a number"))?;
    if !(value.is_finite() && value > 0.0) {
        bail!("{value} must be a positive length");
    }
    Ok(value)
}

/// Outcome of one scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub side: SnapSide,
    pub position: Point,
    pub presentation: PresentationState,
    pub frames: usize,
    pub notes: Vec<String>,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] {:?} edge at ({:.1}, {:.1}), overlay {:?}, {} frames",
            self.scenario.name(),
            self.side,
            self.position.x,
            self.position.y,
            self.presentation,
            self.frames
        )?;
        for note in &self.notes {
            writeln!(f, "    {note}")?;
        }
        Ok(())
    }
}

pub fn run(options: &SimOptions) -> anyhow::Result<Vec<ScenarioReport>> {
    let scenarios: Vec<Scenario> = match options.scenario {
        Scenario::All => Scenario::EACH.to_vec(),
        single => vec![single],
    };
    scenarios
        .into_iter()
        .map(|scenario| run_scenario(options, scenario))
        .collect()
}

fn run_scenario(options: &SimOptions, scenario: Scenario) -> anyhow::Result<ScenarioReport> {
    log::info!("running scenario {}", scenario.name());
    let viewport = Viewport::new(options.width, options.height);
    let mut robot = LauncherRobot::with_viewport(viewport, LauncherSettings::default());
    let mut notes = Vec::new();
    let mut frames = 0;
    let start = robot.button_center();

    match scenario {
        Scenario::Tap => {
            robot.tap(start);
            frames += robot.wait_for_idle();
        }
        Scenario::DragLeft => {
            robot.drag(start, Point::new(options.width * 0.3, start.y + 40.0), 12);
            frames += robot.wait_for_idle();
        }
        Scenario::DragRight => {
            robot.drag(start, Point::new(options.width * 0.6, start.y - 40.0), 12);
            frames += robot.wait_for_idle();
        }
        Scenario::FlingUp => {
            robot.drag(start, Point::new(start.x, -options.height), 4);
            frames += robot.wait_for_idle();
            let (min_y, _) = robot.launcher().bounds().vertical_range();
            notes.push(format!("clamped to top bound {min_y:.1}"));
        }
        Scenario::Interrupt => {
            robot.drag(start, Point::new(options.width * 0.25, start.y), 6);
            robot.advance_frames(3);
            let grabbed_at = robot.launcher().position();
            notes.push(format!(
                "grabbed mid-settle at ({:.1}, {:.1})",
                grabbed_at.x, grabbed_at.y
            ));
            let grab = robot.button_center();
            robot.drag(grab, Point::new(options.width * 0.9, grab.y), 6);
            frames += robot.wait_for_idle();
        }
        Scenario::Rotate => {
            robot.drag(start, Point::new(options.width * 0.2, start.y), 6);
            frames += robot.wait_for_idle();
            robot
                .launcher_mut()
                .set_viewport(Viewport::new(options.height, options.width));
            notes.push(format!(
                "rotated to {}x{}",
                options.height, options.width
            ));
        }
        Scenario::Chat => return run_chat(options),
        Scenario::All => bail!("`all` expands into individual scenarios"),
    }

    log_frames(&robot);
    let launcher = robot.launcher();
    if launcher.phase() != GesturePhase::Idle {
        bail!("{} did not settle", scenario.name());
    }
    Ok(ScenarioReport {
        scenario,
        side: launcher.side(),
        position: launcher.position(),
        presentation: launcher.presentation_state(),
        frames,
        notes,
    })
}

fn run_chat(options: &SimOptions) -> anyhow::Result<ScenarioReport> {
    let viewport = Viewport::new(options.width, options.height);
    let surface = Rc::new(RefCell::new(ChatSurface::new(CannedBackend)));
    let mut robot = LauncherRobot::with_viewport(viewport, LauncherSettings::default())
        .with_surface(Rc::clone(&surface));
    let mut notes = Vec::new();

    robot.tap(robot.button_center());
    let reply = surface
        .borrow_mut()
        .send("How much protein should I eat today?")
        .map(|message| message.text.clone())?;
    notes.push(format!("assistant: {reply}"));
    surface.borrow().minimize();
    let frames = robot.wait_for_idle();
    log_frames(&robot);

    let launcher = robot.launcher();
    notes.push(format!("{} messages kept", surface.borrow().messages().len()));
    Ok(ScenarioReport {
        scenario: Scenario::Chat,
        side: launcher.side(),
        position: launcher.position(),
        presentation: launcher.presentation_state(),
        frames,
        notes,
    })
}

fn log_frames(robot: &LauncherRobot) {
    for (index, frame) in robot.recorded_frames().iter().enumerate() {
        log::debug!(
            "frame {index}: ({:.1}, {:.1}) scale {:.3} opacity {:.2} {:?}",
            frame.position.x,
            frame.position.y,
            frame.scale,
            frame.opacity,
            frame.phase
        );
    }
}

/// Offline stand-in for the nutrition assistant backend.
pub struct CannedBackend;

impl ChatBackend for CannedBackend {
    fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let text = if request.message.to_lowercase().contains("protein") {
            "Around 1.6 g per kg of body weight fits your current goal."
        } else {
            "Noted. Keep logging your meals and water and I'll adjust your targets."
        };
        Ok(ChatReply {
            text: text.to_string(),
            conversation_id: Some("sim".to_string()),
        })
    }

    fn history(&self) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(vec![ChatMessage::assistant(
            "Hi! Ask me anything about today's meals.",
        )])
    }

    fn clear(&self) -> Result<(), ChatError> {
        Ok(())
    }
}
