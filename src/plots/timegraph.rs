//! Time-sequence replay.
//!
//! Each step of a [`GraphTimeObject`] is a list of plots drawn on one fixed
//! frame. Showing a step disposes the painters of the previous one.

use super::{FrameRequest, Plot};
use crate::animation::{Animator, Tick, Wakeup};
use crate::bins::FrameRange;
use crate::error::{Error, Result};
use crate::hit::{Pointer, Tooltip};
use crate::objects::GraphTimeObject;
use crate::options::{ObjectKind, OptionDecoder, RenderOptions};
use crate::pipeline::{DrawQueue, Pad, PadFrame, PlotPainter};
use crate::render::{DrawingSurface, GroupId};

/// Painter replaying a [`GraphTimeObject`].
#[derive(Debug)]
pub struct GraphTimePainter {
    object: GraphTimeObject,
    options: RenderOptions,
    first_group: GroupId,
    animator: Option<Animator>,
    frame: Option<PadFrame>,
    current: Vec<PlotPainter>,
    shown: Option<usize>,
}

impl GraphTimePainter {
    /// Replay painter; step plots draw into groups from `first_group` on.
    #[must_use]
    pub fn new(object: GraphTimeObject, opt: &str, first_group: GroupId) -> Self {
        Self {
            object,
            options: OptionDecoder::decode(opt, ObjectKind::GraphTime),
            first_group,
            animator: None,
            frame: None,
            current: Vec::new(),
            shown: None,
        }
    }

    /// Decoded options.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Index of the step on screen.
    #[must_use]
    pub fn shown_step(&self) -> Option<usize> {
        self.shown
    }

    /// Painters of the step on screen.
    #[must_use]
    pub fn current(&self) -> &[PlotPainter] {
        &self.current
    }

    /// The replay sequencer, once started.
    #[must_use]
    pub fn animator(&self) -> Option<&Animator> {
        self.animator.as_ref()
    }

    /// The fixed frame of the sequence.
    #[must_use]
    pub fn frame_request(&self) -> FrameRequest {
        let (xmin, xmax) = self.object.x_range;
        let (ymin, ymax) = self.object.y_range;
        FrameRequest::Cartesian(FrameRange::new(xmin, xmax, ymin, ymax))
    }

    /// Create the sequence frame and schedule the first step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`] when the pad already has a frame; a
    /// sequence always owns its frame.
    pub fn start(&mut self, existing: Option<&PadFrame>, pad: &Pad<'_>) -> Result<Option<Wakeup>> {
        if existing.is_some() {
            log::warn!("{}: time sequence cannot be drawn over an existing frame", self.object.title);
            return Err(Error::Precondition(format!("{} needs its own frame", self.object.title)));
        }
        self.frame = Some(pad.frame_for(&self.frame_request())?);
        let animator = self.animator.insert(Animator::new(
            self.object.steps.len(),
            self.object.sleep_ms,
            self.options.replay,
            pad.config.min_repeat_sleep(),
        ));
        Ok(animator.start())
    }

    /// Host callback for a wakeup; draws a step when one is due.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QueueOrder`] if the step queue is driven out of order.
    pub fn fire(&mut self, token: u64, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<Option<Wakeup>> {
        let Some(animator) = self.animator.as_mut() else {
            return Ok(None);
        };
        match animator.fire(token) {
            Tick::Stale => Ok(None),
            Tick::Wait(w) => Ok(Some(w)),
            Tick::Draw { step, next } => {
                self.show_step(step, pad, surface)?;
                Ok(next)
            }
        }
    }

    fn show_step(&mut self, step: usize, pad: &Pad<'_>, surface: &mut dyn DrawingSurface) -> Result<()> {
        for painter in &mut self.current {
            painter.dispose(surface);
        }
        let Some(frame) = self.frame.as_ref() else {
            return Err(Error::Precondition("time sequence was not started".to_string()));
        };
        let plots = self.object.steps.get(step).map(Vec::as_slice).unwrap_or_default();
        self.current = plots
            .iter()
            .enumerate()
            .map(|(i, (object, opt))| {
                PlotPainter::new(Plot::from_object(object.clone(), opt), GroupId(self.first_group.0 + i as u64))
            })
            .collect();

        let mut queue = DrawQueue::new(self.current.len());
        while let Some(i) = queue.start_next() {
            if let Err(e) = self.current[i].draw(Some(frame.clone()), pad, surface) {
                log::warn!("{}: step {step} plot {i} skipped: {e}", self.object.title);
            }
            queue.complete(i)?;
        }
        self.shown = Some(step);
        Ok(())
    }

    /// Nearest tooltip among the plots on screen.
    pub fn locate(&mut self, pointer: &Pointer, pad: &Pad<'_>) -> Option<Tooltip> {
        self.current
            .iter_mut()
            .filter_map(|p| p.locate(pointer, pad))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Cancel the replay and release the plots on screen.
    pub fn stop(&mut self, surface: &mut dyn DrawingSurface) {
        if let Some(animator) = self.animator.as_mut() {
            animator.cancel();
        }
        for painter in &mut self.current {
            painter.dispose(surface);
        }
        self.current.clear();
        self.shown = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationState, WakeupKind};
    use crate::config::RenderConfig;
    use crate::objects::{GraphObject, PlotObject};
    use crate::options::ReplayMode;
    use crate::output::SvgSurface;

    fn sequence() -> GraphTimeObject {
        let step = |y: f64| {
            let g = GraphObject::new(vec![0.0, 1.0], vec![0.0, y]).expect("graph");
            vec![(PlotObject::Graph(g.clone()), "L".to_string()), (PlotObject::Graph(g), "P".to_string())]
        };
        GraphTimeObject {
            title: "replay".to_string(),
            steps: vec![step(1.0), step(2.0)],
            sleep_ms: 500,
            x_range: (0.0, 1.0),
            y_range: (0.0, 2.0),
        }
    }

    #[test]
    fn test_steps_replace_each_other() {
        let config = RenderConfig::default();
        let pad = Pad::new(100.0, 100.0, &config);
        let mut surface = SvgSurface::new(100, 100);
        let mut painter = GraphTimePainter::new(sequence(), "ONCE", GroupId(0));
        assert_eq!(painter.options().replay, ReplayMode::Once);

        let first = painter.start(None, &pad).expect("start").expect("wakeup");
        let timer = painter.fire(first.token, &pad, &mut surface).expect("fire").expect("next step");
        assert_eq!(painter.shown_step(), Some(0));
        assert_eq!(surface.group_ids().count(), 2);
        let before = surface.group(GroupId(0)).expect("group").clone();
        assert_eq!(timer.kind, WakeupKind::Timer(std::time::Duration::from_millis(500)));

        let frame = painter.fire(timer.token, &pad, &mut surface).expect("fire").expect("frame");
        assert!(painter.fire(frame.token, &pad, &mut surface).expect("fire").is_none());
        assert_eq!(painter.shown_step(), Some(1));
        assert_eq!(surface.group_ids().count(), 2);
        assert_ne!(surface.group(GroupId(0)).expect("group"), &before);
        assert_eq!(painter.animator().expect("animator").state(), AnimationState::Finished);
    }

    #[test]
    fn test_existing_frame_rejected() {
        let config = RenderConfig::default();
        let pad = Pad::new(100.0, 100.0, &config);
        let mut painter = GraphTimePainter::new(sequence(), "", GroupId(0));
        let frame = pad.frame_for(&painter.frame_request()).expect("frame");
        assert!(matches!(painter.start(Some(&frame), &pad), Err(Error::Precondition(_))));
        assert!(painter.animator().is_none());
    }

    #[test]
    fn test_stop_cancels_and_clears() {
        let config = RenderConfig::default();
        let pad = Pad::new(100.0, 100.0, &config);
        let mut surface = SvgSurface::new(100, 100);
        let mut painter = GraphTimePainter::new(sequence(), "", GroupId(0));
        let first = painter.start(None, &pad).expect("start").expect("wakeup");
        let next = painter.fire(first.token, &pad, &mut surface).expect("fire").expect("next");

        painter.stop(&mut surface);
        assert_eq!(surface.group_ids().count(), 0);
        assert!(painter.fire(next.token, &pad, &mut surface).expect("fire").is_none());
        assert_eq!(painter.animator().expect("animator").state(), AnimationState::Cancelled);
    }
}
