//! Desktop preview app for myrtio-lighthouse
//!
//! Runs a fleet of lights against a simulated clock and draws each light as a
//! disc whose brightness follows its duty value. Time only moves when the UI
//! pushes it, so the speed slider can replay a whole tidal cycle in seconds.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Wake, Waker};
use std::time::Instant as StdInstant;

use eframe::egui::{self};
use myrtio_lighthouse::presets::{self, WADDEN_LIGHTS};
use myrtio_lighthouse::{
    Characteristic, Clock, DEFAULT_DUTY_MAX, Duration, FleetConfig, FleetScheduler, ManualClock,
    ModeGate, OutputSink,
};

/// Lights shown in the preview, in display order
const LIGHTS: [(&str, &str); WADDEN_LIGHTS] = [
    ("Texel", "Fl(2) W 10s"),
    ("Vlieland", "Iso W 4s"),
    ("Terschelling", "Fl W 5s"),
    ("Ameland", "Fl(3) W 15s"),
    ("Schiermonnikoog", "Fl(4) W 20s"),
];

/// Default tidal cycle for preview (shorter than production for responsiveness)
const DEFAULT_TIDAL_SECS: u64 = 60;

/// Radius of each light disc in pixels
const DISC_RADIUS: f32 = 36.0;

/// Gap between discs
const DISC_GAP: f32 = 48.0;

/// Upper bound on polls per frame, in case a light never sleeps
const MAX_POLLS_PER_FRAME: usize = 100_000;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 420.0])
            .with_title("Lighthouse Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "myrtio-lighthouse-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

/// Sink that only remembers the last duty value
#[derive(Clone, Default)]
struct PreviewSink {
    level: Rc<Cell<u16>>,
}

impl OutputSink for PreviewSink {
    fn write(&mut self, duty: u16) {
        self.level.set(duty);
    }
}

/// Gate backed by the "continuous" checkbox
struct PreviewGate(Rc<Cell<bool>>);

impl ModeGate for PreviewGate {
    fn read(&mut self) -> bool {
        self.0.get()
    }
}

type PreviewScheduler = FleetScheduler<PreviewSink, PreviewGate, WADDEN_LIGHTS>;

async fn simulate(clock: Rc<ManualClock>, mut scheduler: PreviewScheduler) {
    scheduler.run(&*clock).await
}

struct WakeFlag(AtomicBool);

impl Wake for WakeFlag {
    fn wake(self: Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Scheduler task polled by hand against a [`ManualClock`]
struct Simulation {
    clock: Rc<ManualClock>,
    levels: [Rc<Cell<u16>>; WADDEN_LIGHTS],
    task: Pin<Box<dyn Future<Output = ()>>>,
    woken: Arc<WakeFlag>,
    waker: Waker,
}

impl Simulation {
    fn new(
        config: FleetConfig,
        characteristics: [Characteristic; WADDEN_LIGHTS],
        continuous: Rc<Cell<bool>>,
    ) -> Self {
        let clock = Rc::new(ManualClock::new());
        let sinks: [PreviewSink; WADDEN_LIGHTS] = Default::default();
        let levels = sinks.each_ref().map(|sink| sink.level.clone());
        let scheduler =
            FleetScheduler::new(config, characteristics, sinks, PreviewGate(continuous));
        let woken = Arc::new(WakeFlag(AtomicBool::new(false)));

        Self {
            task: Box::pin(simulate(clock.clone(), scheduler)),
            clock,
            levels,
            waker: Waker::from(woken.clone()),
            woken,
        }
    }

    fn now_ms(&self) -> u64 {
        self.clock.now().as_millis()
    }

    /// Move simulated time forward by `by`, stopping at every deadline on the
    /// way so each write lands at its own instant.
    fn advance(&mut self, by: Duration) {
        let target = self.clock.now() + by;
        let mut cx = Context::from_waker(&self.waker);

        for _ in 0..MAX_POLLS_PER_FRAME {
            self.clock.begin_poll();
            self.woken.0.store(false, Ordering::SeqCst);

            if self.task.as_mut().poll(&mut cx).is_ready() {
                break;
            }
            if self.woken.0.load(Ordering::SeqCst) {
                continue;
            }
            match self.clock.next_deadline() {
                Some(deadline) if deadline <= target => self.clock.advance_to(deadline),
                _ => break,
            }
        }
        self.clock.advance_to(target);
    }
}

struct PreviewApp {
    simulation: Simulation,
    /// Notation text per light, applied on "Apply"
    notations: [String; WADDEN_LIGHTS],
    /// Parse or validation problem per light
    problems: [Option<String>; WADDEN_LIGHTS],
    /// Shared with the mode gate
    continuous: Rc<Cell<bool>>,
    tidal_secs: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
}

impl PreviewApp {
    fn new() -> Self {
        let continuous = Rc::new(Cell::new(false));
        let notations = LIGHTS.map(|(_, notation)| notation.to_owned());

        Self {
            simulation: Simulation::new(
                Self::config(DEFAULT_TIDAL_SECS),
                presets::wadden(),
                continuous.clone(),
            ),
            notations,
            problems: Default::default(),
            continuous,
            tidal_secs: DEFAULT_TIDAL_SECS,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
        }
    }

    fn config(tidal_secs: u64) -> FleetConfig {
        FleetConfig::DEFAULT.with_tidal_cycle(Duration::from_secs(tidal_secs))
    }

    /// Restart the simulation from zero with the current notations.
    ///
    /// Keeps the running simulation if any notation fails to parse.
    fn restart(&mut self) {
        let parsed: Vec<_> = LIGHTS
            .iter()
            .zip(&self.notations)
            .map(|(&(name, _), notation)| Characteristic::parse(name, notation))
            .collect();

        for (problem, result) in self.problems.iter_mut().zip(&parsed) {
            *problem = match result {
                Ok(characteristic) => characteristic.validate().err().map(|err| err.to_string()),
                Err(err) => Some(err.to_string()),
            };
        }

        let Ok(characteristics) = parsed.into_iter().collect::<Result<Vec<_>, _>>() else {
            return;
        };
        let Ok(characteristics): Result<[Characteristic; WADDEN_LIGHTS], _> =
            characteristics.try_into()
        else {
            return;
        };
        self.simulation = Simulation::new(
            Self::config(self.tidal_secs),
            characteristics,
            self.continuous.clone(),
        );
        self.last_frame = StdInstant::now();
    }

    /// Advance simulated time by the scaled wall-clock delta
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            let delta_us = delta.as_secs_f64() * 1_000_000.0 * f64::from(self.time_scale);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_us = if delta_us.is_finite() {
                delta_us.max(0.0) as u64
            } else {
                0
            };
            self.simulation.advance(Duration::from_micros(delta_us));
        }
    }

    fn draw_lights(&self, ui: &mut egui::Ui) {
        let pitch = DISC_RADIUS * 2.0 + DISC_GAP;
        #[allow(clippy::cast_precision_loss)]
        let width = WADDEN_LIGHTS as f32 * pitch;
        let (response, painter) = ui.allocate_painter(
            egui::vec2(width.max(ui.available_width()), DISC_RADIUS * 2.0 + 80.0),
            egui::Sense::hover(),
        );
        let origin = response.rect.min;

        #[allow(clippy::cast_precision_loss)]
        for (index, level) in self.simulation.levels.iter().enumerate() {
            let center = egui::pos2(
                origin.x + DISC_GAP / 2.0 + DISC_RADIUS + index as f32 * pitch,
                origin.y + DISC_RADIUS + 8.0,
            );
            let fraction = f32::from(level.get()) / f32::from(DEFAULT_DUTY_MAX);
            painter.circle_filled(center, DISC_RADIUS, lamp_color(fraction));

            let (name, _) = LIGHTS[index];
            let label = format!("{name}\n{:.0}%", fraction * 100.0);
            painter.text(
                center + egui::vec2(0.0, DISC_RADIUS + 8.0),
                egui::Align2::CENTER_TOP,
                label,
                egui::FontId::proportional(14.0),
                ui.visuals().text_color(),
            );
        }
    }
}

/// Blend from an unlit lens to warm white.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lamp_color(fraction: f32) -> egui::Color32 {
    let fraction = fraction.clamp(0.0, 1.0);
    let mix = |dark: f32, lit: f32| (dark + (lit - dark) * fraction).round() as u8;
    egui::Color32::from_rgb(mix(30.0, 255.0), mix(32.0, 244.0), mix(36.0, 214.0))
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();

        // Request continuous repaint for animation
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // <PlaybackControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("⏮ Reset").clicked() {
                            self.restart();
                        }
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.playing = !self.playing;
                        }
                    });

                    ui.add_space(4.0);

                    let t_ms = self.simulation.now_ms();
                    ui.label(format!("Time: {}.{:03}s", t_ms / 1000, t_ms % 1000));

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Speed:");
                        ui.add(
                            egui::Slider::new(&mut self.time_scale, 0.1..=20.0).logarithmic(true),
                        );
                    });
                });
                // </PlaybackControls>
                ui.add_space(16.0);
                // <FleetControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Tidal cycle (s):");
                        ui.add(egui::Slider::new(&mut self.tidal_secs, 10..=480));
                    });

                    ui.add_space(4.0);

                    let mut continuous = self.continuous.get();
                    if ui.checkbox(&mut continuous, "Continuous").changed() {
                        self.continuous.set(continuous);
                    }
                });
                // </FleetControls>
            });

            ui.add_space(16.0);

            ui.vertical(|ui| {
                for (index, notation) in self.notations.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(LIGHTS[index].0);
                        ui.text_edit_singleline(notation);
                        if let Some(problem) = &self.problems[index] {
                            ui.colored_label(egui::Color32::LIGHT_RED, problem);
                        }
                    });
                }
                if ui.button("Apply").clicked() {
                    self.restart();
                }
            });

            ui.add_space(16.0);

            self.draw_lights(ui);
        });
    }
}
