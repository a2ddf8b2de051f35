//! # Replay
//!
//! Stands in for the platform: keeps one recognizer per (layer, gesture kind), asks the canvas
//! whether each recognizer may start, feeds it the scripted motion, and delivers it.

use sketchpad_core::gesture::{PanGesture, PinchGesture, RotationGesture};
use sketchpad_core::{
    Affine2D, Canvas, DrawableKind, Gesture, GestureKind, GestureOutcome, GesturePhase, LayerID,
};

use crate::script::{EventSpec, Script};
use crate::settings::Settings;

/// Tally of what happened to each scripted event.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Stats {
    /// Reached a layer's handler.
    pub delivered: usize,
    /// ...and was acted on rather than ignored by the layer.
    pub applied: usize,
    /// Recognizer not allowed to start.
    pub refused: usize,
    /// Motion for a recognizer that never started.
    pub dropped: usize,
}

#[derive(Clone, Debug)]
pub struct LayerReport {
    pub name: String,
    pub kind: DrawableKind,
    pub selected: bool,
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub rotation: cgmath::Deg<f32>,
    pub matrix: Option<Affine2D>,
}
impl std::fmt::Display for LayerReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = if self.selected { '*' } else { ' ' };
        write!(
            f,
            "{marker} {} ({}) at [{:.2}, {:.2}], scale [{:.3}, {:.3}], rotated {:.2} deg",
            self.name,
            self.kind,
            self.position[0],
            self.position[1],
            self.scale[0],
            self.scale[1],
            self.rotation.0,
        )?;
        if let Some(matrix) = self.matrix {
            let [[a, b], [c, d], [tx, ty]] = matrix.elements;
            write!(
                f,
                "\n    [{a:.3} {c:.3} {tx:.2}]\n    [{b:.3} {d:.3} {ty:.2}]"
            )?;
        }
        Ok(())
    }
}

/// Final state of the canvas, back to front.
#[derive(Clone, Debug)]
pub struct Report {
    pub layers: Vec<LayerReport>,
    pub stats: Stats,
}
impl Report {
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&LayerReport> {
        self.layers.iter().find(|layer| layer.name == name)
    }
}
impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for layer in &self.layers {
            writeln!(f, "{layer}")?;
        }
        write!(
            f,
            "{} delivered, {} applied, {} refused, {} dropped",
            self.stats.delivered, self.stats.applied, self.stats.refused, self.stats.dropped
        )
    }
}

pub struct Replay<'s> {
    settings: &'s Settings,
    canvas: Canvas,
    /// Script order, for stable lookups by name.
    names: Vec<(String, LayerID)>,
    /// Recognizers that began and have not yet finished.
    sessions: hashbrown::HashMap<(LayerID, GestureKind), Gesture>,
    stats: Stats,
}
impl<'s> Replay<'s> {
    /// Build the canvas a script describes. Payload paths resolve against `base`.
    pub fn new(
        settings: &'s Settings,
        script: &Script,
        base: &std::path::Path,
    ) -> anyhow::Result<Self> {
        let mut canvas = Canvas::new();
        let mut names = Vec::with_capacity(script.layers.len());
        for layer in &script.layers {
            let drawable = layer.drawable(base)?;
            let id = canvas
                .add_layer(layer.origin, layer.size, drawable)
                .map_err(|e| anyhow::anyhow!("layer {:?}: {e}", layer.name))?;
            names.push((layer.name.clone(), id));
        }
        Ok(Self {
            settings,
            canvas,
            names,
            sessions: hashbrown::HashMap::new(),
            stats: Stats::default(),
        })
    }
    fn id(&self, name: &str) -> Option<LayerID> {
        self.names
            .iter()
            .find_map(|(other, id)| (other == name).then_some(*id))
    }
    fn name(&self, id: LayerID) -> &str {
        self.names
            .iter()
            .find_map(|(name, other)| (*other == id).then_some(name.as_str()))
            .unwrap_or("?")
    }
    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
    pub fn run(&mut self, events: &[EventSpec]) {
        for event in events {
            self.step(event);
        }
    }
    pub fn step(&mut self, event: &EventSpec) {
        let Some(id) = self.id(event.layer()) else {
            // Scripts are validated, only reachable with hand built events.
            log::warn!("event for unknown layer {:?}", event.layer());
            return;
        };
        match *event {
            EventSpec::Tap { .. } => {
                // Discrete, so there is no session to keep.
                self.begin(id, GestureKind::Tap);
                let mut tap = Gesture::Tap;
                self.deliver(id, &mut tap);
            }
            EventSpec::Pan { delta, phase, .. } => {
                self.continuous(id, GestureKind::Pan, phase.into(), |gesture| {
                    if let Gesture::Pan(pan) = gesture {
                        pan.accumulate(delta);
                    }
                });
            }
            EventSpec::Pinch { scale, phase, .. } => {
                self.continuous(id, GestureKind::Pinch, phase.into(), |gesture| {
                    if let Gesture::Pinch(pinch) = gesture {
                        pinch.accumulate(scale);
                    }
                });
            }
            EventSpec::Rotate { radians, phase, .. } => {
                self.continuous(id, GestureKind::Rotate, phase.into(), |gesture| {
                    if let Gesture::Rotate(rotate) = gesture {
                        rotate.accumulate(radians);
                    }
                });
            }
            EventSpec::Remove { .. } => {
                self.sessions.retain(|(layer, _), _| *layer != id);
                if let Err(e) = self.canvas.remove_layer(id) {
                    log::warn!("remove {:?}: {e}", self.name(id));
                }
            }
        }
    }
    /// Ask whether a recognizer may start. Always yes with admission off.
    fn begin(&mut self, id: LayerID, kind: GestureKind) -> bool {
        if !self.settings.enforce_admission {
            return true;
        }
        match self.canvas.should_begin(id, kind) {
            Ok(true) => true,
            Ok(false) => {
                log::trace!("{kind} refused to begin on {:?}", self.name(id));
                self.stats.refused += 1;
                false
            }
            Err(e) => {
                log::warn!("{kind} on {:?}: {e}", self.name(id));
                false
            }
        }
    }
    fn continuous(
        &mut self,
        id: LayerID,
        kind: GestureKind,
        phase: GesturePhase,
        feed: impl FnOnce(&mut Gesture),
    ) {
        let key = (id, kind);
        match phase {
            // Recognizers act from began onwards.
            GesturePhase::Possible => return,
            GesturePhase::Failed => {
                self.sessions.remove(&key);
                return;
            }
            GesturePhase::Began => {
                // A began while already running restarts the recognizer.
                self.sessions.remove(&key);
                if !self.begin(id, kind) {
                    return;
                }
                self.sessions.insert(key, fresh(kind));
            }
            GesturePhase::Changed | GesturePhase::Ended | GesturePhase::Cancelled => {
                if !self.settings.enforce_admission {
                    self.sessions.entry(key).or_insert_with(|| fresh(kind));
                }
            }
        }
        let Some(mut gesture) = self.sessions.remove(&key) else {
            log::trace!("dropped {kind} on {:?}, not recognizing", self.name(id));
            self.stats.dropped += 1;
            return;
        };
        set_phase(&mut gesture, phase);
        feed(&mut gesture);
        self.deliver(id, &mut gesture);
        if !phase.is_finished() {
            self.sessions.insert(key, gesture);
        }
    }
    fn deliver(&mut self, id: LayerID, gesture: &mut Gesture) {
        match self.canvas.handle(id, gesture) {
            Ok(outcome) => {
                self.stats.delivered += 1;
                if !matches!(outcome, GestureOutcome::Ignored(_)) {
                    self.stats.applied += 1;
                }
            }
            Err(e) => log::warn!("{} on {:?}: {e}", gesture.kind(), self.name(id)),
        }
    }
    #[must_use]
    pub fn report(&self) -> Report {
        let selected = self.canvas.selected();
        let layers = self
            .canvas
            .layers_back_to_front()
            .map(|layer| LayerReport {
                name: self.name(layer.id()).to_owned(),
                kind: layer.kind(),
                selected: selected == Some(layer.id()),
                position: layer.position(),
                scale: layer.scale(),
                rotation: layer.rotation().into(),
                matrix: self
                    .settings
                    .report_transforms
                    .then(|| layer.transform()),
            })
            .collect();
        Report {
            layers,
            stats: self.stats,
        }
    }
}

/// A recognizer with an empty accumulator.
fn fresh(kind: GestureKind) -> Gesture {
    match kind {
        GestureKind::Tap => Gesture::Tap,
        GestureKind::Pan => Gesture::Pan(PanGesture::default()),
        GestureKind::Pinch => Gesture::Pinch(PinchGesture::default()),
        GestureKind::Rotate => Gesture::Rotate(RotationGesture::default()),
    }
}
fn set_phase(gesture: &mut Gesture, phase: GesturePhase) {
    match gesture {
        Gesture::Tap => (),
        Gesture::Pan(pan) => pan.phase = phase,
        Gesture::Pinch(pinch) => pinch.phase = phase,
        Gesture::Rotate(rotate) => rotate.phase = phase,
    }
}

/// Load, replay, and report on a script file.
pub fn replay_path(path: &std::path::Path, settings: &Settings) -> anyhow::Result<Report> {
    let script = Script::read_path(path)?;
    let base = path.parent().unwrap_or(std::path::Path::new("."));
    let mut replay = Replay::new(settings, &script, base)?;
    replay.run(&script.events);
    Ok(replay.report())
}

#[cfg(test)]
mod test {
    use super::*;

    const SCENARIO: &str = r#"
        [[layer]]
        name = "a"
        origin = [0.0, 0.0]
        size = [100.0, 100.0]
        drawable = "stock-path"

        [[layer]]
        name = "b"
        origin = [0.0, 0.0]
        size = [100.0, 100.0]
        drawable = "raster"

        [[event]]
        action = "tap"
        layer = "a"

        [[event]]
        action = "pan"
        layer = "b"
        delta = [5.0, 0.0]
        phase = "began"

        [[event]]
        action = "pan"
        layer = "a"
        delta = [5.0, 0.0]
        phase = "began"

        [[event]]
        action = "pan"
        layer = "a"
        phase = "ended"
        delta = [0.0, 0.0]

        [[event]]
        action = "tap"
        layer = "a"

        [[event]]
        action = "pan"
        layer = "a"
        delta = [5.0, 0.0]
        phase = "began"
    "#;

    fn replay(settings: &Settings, script: &str) -> Report {
        let script = Script::from_toml(script).unwrap();
        let mut replay = Replay::new(settings, &script, std::path::Path::new(".")).unwrap();
        replay.run(&script.events);
        replay.report()
    }
    fn close2(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn scenario_with_admission() {
        let settings = Settings::default();
        let report = replay(&settings, SCENARIO);

        let a = report.layer("a").unwrap();
        let b = report.layer("b").unwrap();
        assert!(close2(a.position, [55.0, 50.0]));
        assert!(close2(b.position, [50.0, 50.0]));
        assert!(!a.selected && !b.selected);
        // A was dragged to the front.
        assert_eq!(report.layers[1].name, "a");
        // B's pan and A's final pan never start.
        assert_eq!(report.stats.refused, 2);
        assert_eq!(report.stats.dropped, 0);
        assert_eq!(report.stats.delivered, 4);
        // Both taps and both of A's pans, the ended one included.
        assert_eq!(report.stats.applied, 4);
    }
    #[test]
    fn scenario_without_admission() {
        let mut settings = Settings::default();
        settings.enforce_admission = false;
        let report = replay(&settings, SCENARIO);

        // Same result, the layers' own guards catch what admission would have.
        let a = report.layer("a").unwrap();
        assert!(close2(a.position, [55.0, 50.0]));
        assert_eq!(report.stats.refused, 0);
        assert_eq!(report.stats.delivered, 6);
        assert_eq!(report.stats.applied, 4);
    }
    #[test]
    fn motion_after_refusal_is_dropped() {
        let settings = Settings::default();
        let report = replay(
            &settings,
            r#"
            [[layer]]
            name = "v"
            origin = [0.0, 0.0]
            size = [10.0, 10.0]
            drawable = "vector"

            [[event]]
            action = "rotate"
            layer = "v"
            radians = 1.0
            phase = "began"

            [[event]]
            action = "tap"
            layer = "v"

            [[event]]
            action = "rotate"
            layer = "v"
            radians = 1.0
            "#,
        );
        // Selecting mid-gesture doesn't resurrect a refused recognizer.
        assert_eq!(report.stats.refused, 1);
        assert_eq!(report.stats.dropped, 1);
        assert!(report.layer("v").unwrap().selected);
        assert!(report.layer("v").unwrap().rotation.0.abs() < 1e-4);
    }
    #[test]
    fn pinch_session_accumulates_and_stops_at_end() {
        let settings = Settings::default();
        let report = replay(
            &settings,
            r#"
            [[layer]]
            name = "v"
            origin = [0.0, 0.0]
            size = [10.0, 10.0]
            drawable = "vector"

            [[event]]
            action = "tap"
            layer = "v"

            [[event]]
            action = "pinch"
            layer = "v"
            scale = 2.0
            phase = "began"

            [[event]]
            action = "pinch"
            layer = "v"
            scale = 1.5

            [[event]]
            action = "pinch"
            layer = "v"
            scale = 4.0
            phase = "ended"

            [[event]]
            action = "pinch"
            layer = "v"
            scale = 4.0
            "#,
        );
        let v = report.layer("v").unwrap();
        // The ended delta is ignored by the layer, the one after has no recognizer.
        assert!(close2(v.scale, [3.0, 3.0]));
        assert_eq!(report.stats.dropped, 1);
    }
    #[test]
    fn removal_clears_selection() {
        let settings = Settings::default();
        let script = Script::from_toml(
            r#"
            [[layer]]
            name = "v"
            origin = [0.0, 0.0]
            size = [10.0, 10.0]
            drawable = "vector"

            [[event]]
            action = "tap"
            layer = "v"

            [[event]]
            action = "remove"
            layer = "v"

            [[event]]
            action = "tap"
            layer = "v"
            "#,
        )
        .unwrap();
        let mut replay = Replay::new(&settings, &script, std::path::Path::new(".")).unwrap();
        replay.run(&script.events);
        assert_eq!(replay.canvas().selected(), None);
        assert!(replay.canvas().is_empty());
        assert!(replay.report().layers.is_empty());
    }
    #[test]
    fn report_formats() {
        let settings = Settings::default();
        let report = replay(&settings, SCENARIO);
        let text = report.to_string();
        assert!(text.contains("a (StockPath) at [55.00, 50.00]"));
        assert!(text.ends_with("4 delivered, 4 applied, 2 refused, 0 dropped"));
    }
    #[test]
    fn refused_start_is_not_dropped() {
        let settings = Settings::default();
        let report = replay(
            &settings,
            r#"
            [[layer]]
            name = "v"
            origin = [0.0, 0.0]
            size = [10.0, 10.0]
            drawable = "vector"

            [[event]]
            action = "pan"
            layer = "v"
            delta = [1.0, 0.0]
            phase = "began"

            [[event]]
            action = "pinch"
            layer = "v"
            scale = 2.0
            phase = "began"
            "#,
        );
        assert_eq!(
            report.stats,
            Stats {
                delivered: 0,
                applied: 0,
                refused: 2,
                dropped: 0,
            }
        );
    }
}
