use super::{Completion, Cue, ElementId, ParseError, Prop, Step, TweenEngine};
use std::str::FromStr;

/// Where a timeline entry starts, relative to what is already placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Right after the current end of the timeline.
    Sequence,
    /// Offset from the current end (`"-=0.3"`, `"+=0.2"`).
    Relative(f32),
    /// Together with the previously added entry (`"<"`).
    WithPrevious,
    /// Absolute time from the timeline start.
    At(f32),
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || ParseError::Position(s.to_string());
        if s.is_empty() || s == ">" {
            return Ok(Position::Sequence);
        }
        if s == "<" {
            return Ok(Position::WithPrevious);
        }
        if let Some(n) = s.strip_prefix("+=") {
            return n.parse::<f32>().map(Position::Relative).map_err(|_| bad());
        }
        if let Some(n) = s.strip_prefix("-=") {
            return n.parse::<f32>().map(|v| Position::Relative(-v)).map_err(|_| bad());
        }
        s.parse::<f32>()
            .ok()
            .filter(|v| *v >= 0.0)
            .map(Position::At)
            .ok_or_else(bad)
    }
}

#[derive(Clone, Debug)]
struct Entry {
    start: f32,
    targets: Vec<ElementId>,
    step: Step,
    from: Option<Vec<(Prop, f32)>>,
}

/// Ordered, overlapping composition of steps with relative start offsets.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    delay: f32,
    entries: Vec<Entry>,
    end: f32,
    last_start: f32,
    on_complete: Option<Cue>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn on_complete(mut self, cue: Cue) -> Self {
        self.on_complete = Some(cue);
        self
    }

    pub fn to(&mut self, targets: &[ElementId], step: Step, at: Position) -> &mut Self {
        self.place(targets, step, at, None)
    }

    pub fn from(
        &mut self,
        targets: &[ElementId],
        from: &[(Prop, f32)],
        step: Step,
        at: Position,
    ) -> &mut Self {
        self.place(targets, step, at, Some(from.to_vec()))
    }

    fn place(
        &mut self,
        targets: &[ElementId],
        step: Step,
        at: Position,
        from: Option<Vec<(Prop, f32)>>,
    ) -> &mut Self {
        // Missing markup places nothing and takes no time.
        if targets.is_empty() {
            return self;
        }
        let start = match at {
            Position::Sequence => self.end,
            Position::Relative(offset) => (self.end + offset).max(0.0),
            Position::WithPrevious => self.last_start,
            Position::At(t) => t,
        };
        self.end = self.end.max(start + step.delay + step.span(targets.len()));
        self.last_start = start;
        self.entries.push(Entry {
            start,
            targets: targets.to_vec(),
            step,
            from,
        });
        self
    }

    /// Length in seconds, excluding the leading delay.
    pub fn duration(&self) -> f32 {
        self.end
    }

    /// Schedule every entry on `engine`, starting at `now`.
    pub fn play(&self, engine: &mut TweenEngine, now: f64) {
        for entry in &self.entries {
            let step = Step {
                delay: self.delay + entry.start + entry.step.delay,
                ..entry.step.clone()
            };
            match &entry.from {
                Some(from) => engine.from(&entry.targets, from, &step, now, Completion::None),
                None => engine.to(&entry.targets, &step, now, Completion::None),
            }
        }
        if let Some(cue) = self.on_complete {
            engine.schedule(now + f64::from(self.delay + self.end), cue);
        }
    }
}
