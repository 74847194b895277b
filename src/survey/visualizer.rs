//! Visualization pass over a finalized survey

use crate::errors::SurveyError;
use crate::types::Coord;

use super::axis::Axis;
use super::hooks::SurveyHooks;
use super::{Plothandler, SurveyPhase};

/// Reacts to discontinuities in the visualized sequence
pub trait JumpHook {
    /// Called for each jump sentinel, with its index in the output
    fn notify_jump(&mut self, _index: usize, _pt: &Coord) {}
}

/// Ignores jumps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoJumpHook;

impl JumpHook for NoJumpHook {}

/// Remembers where jumps are so the output can be cut into polylines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentCollector {
    jumps: Vec<usize>,
}

impl SegmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output indices of the jump sentinels seen so far
    pub fn jumps(&self) -> &[usize] {
        &self.jumps
    }

    /// Split `output` at the recorded jumps. Empty segments are skipped.
    pub fn segments<'c>(&self, output: &'c [Coord]) -> Vec<&'c [Coord]> {
        let mut segments = Vec::new();
        let mut start = 0;
        for &jump in self.jumps.iter().chain(std::iter::once(&output.len())) {
            let end = jump.min(output.len());
            if start < end {
                segments.push(&output[start..end]);
            }
            start = end + 1;
        }
        segments
    }
}

impl JumpHook for SegmentCollector {
    fn notify_jump(&mut self, index: usize, _pt: &Coord) {
        self.jumps.push(index);
    }
}

/// Produces the render-ready sequence of one plot
pub struct PlotVisualizer<'a, H: SurveyHooks, J: JumpHook = NoJumpHook> {
    axis: &'a Axis,
    handler: &'a mut Plothandler<H>,
    jump_hook: J,
}

impl<'a, H: SurveyHooks> PlotVisualizer<'a, H, NoJumpHook> {
    pub fn new(axis: &'a Axis, handler: &'a mut Plothandler<H>) -> Self {
        Self::with_jump_hook(axis, handler, NoJumpHook)
    }
}

impl<'a, H: SurveyHooks, J: JumpHook> PlotVisualizer<'a, H, J> {
    pub fn with_jump_hook(axis: &'a Axis, handler: &'a mut Plothandler<H>, jump_hook: J) -> Self {
        Self {
            axis,
            handler,
            jump_hook,
        }
    }

    pub fn jump_hook(&self) -> &J {
        &self.jump_hook
    }

    pub fn into_jump_hook(self) -> J {
        self.jump_hook
    }

    /// Transform the surveyed sequence into a new one.
    ///
    /// Valid points keep their survey-space coordinates in `untransformed`
    /// and, with a numeric meta strategy, get `metatransformed`. The
    /// handler's own sequence is left untouched.
    pub fn get_visualization_output(&mut self) -> Result<Vec<Coord>, SurveyError> {
        if self.handler.phase() != SurveyPhase::VisualizationReady {
            return Err(SurveyError::PhaseViolation {
                operation: "get_visualization_output",
                phase: self.handler.phase(),
            });
        }
        let numeric_meta = self.handler.point_meta().is_some() && !self.handler.is_symbolic_meta();

        let mut output = Vec::with_capacity(self.handler.coords().len());
        for index in 0..self.handler.coords().len() {
            let mut pt = self.handler.coords()[index].clone();
            if pt.is_valid() {
                pt.untransformed = Some(pt.x);
                self.axis.visphase_transform_coordinate(&mut pt);
                if numeric_meta {
                    let meta = pt.meta.as_ref().and_then(|m| m.as_number());
                    pt.metatransformed = Some(self.handler.visualization_transform_meta(meta)?);
                }
            } else {
                self.jump_hook.notify_jump(index, &pt);
            }
            output.push(pt);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::DatascaleTrafo;
    use crate::survey::config::{PlothandlerConfig, UnboundedCoords};
    use crate::survey::meta::{ExplicitSymbolic, PointMetaHandler};
    use crate::survey::serialize::{PlainNumberFormat, serialize_coords};
    use crate::types::{Dir, MetaValue, RawRecord};

    fn surveyed(config: PlothandlerConfig, records: Vec<RawRecord>) -> (Axis, Plothandler) {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(config)
            .unwrap()
            .with_point_meta(PointMetaHandler::coord(2).unwrap());
        handler.survey_start().unwrap();
        for raw in records {
            handler.survey_point(&mut axis, raw).unwrap();
        }
        axis.survey_to_pgfplots(&mut handler, &PlainNumberFormat).unwrap();
        handler.visualization_phase_init(&axis).unwrap();
        (axis, handler)
    }

    #[test]
    fn output_is_transformed_copy() {
        let (mut axis, mut handler) = surveyed(
            PlothandlerConfig::default(),
            vec![RawRecord::xy(1.0, 2.0), RawRecord::xy(5.0, 6.0)],
        );
        axis.set_datascale_trafo(Dir::X, DatascaleTrafo::new(1, 0.0).unwrap());
        let before = handler.coords().to_vec();

        let output = PlotVisualizer::new(&axis, &mut handler)
            .get_visualization_output()
            .unwrap();

        assert_eq!(output[0].x, [Some(10.0), Some(2.0), None]);
        assert_eq!(output[0].untransformed, Some([Some(1.0), Some(2.0), None]));
        assert_eq!(output[0].metatransformed, Some(0.0));
        assert_eq!(output[1].metatransformed, Some(1000.0));
        assert_eq!(handler.coords(), &before[..]);
    }

    #[test]
    fn jumps_reach_the_hook() {
        let config = PlothandlerConfig::default().with_unbounded_coords(UnboundedCoords::Jump);
        let (axis, mut handler) = surveyed(
            config,
            vec![
                RawRecord::xy(1.0, 2.0),
                RawRecord::xy(2.0, 3.0),
                RawRecord::xy(3.0, "inf"),
                RawRecord::xy(5.0, 6.0),
            ],
        );

        let mut visualizer = PlotVisualizer::with_jump_hook(&axis, &mut handler, SegmentCollector::new());
        let output = visualizer.get_visualization_output().unwrap();
        let collector = visualizer.into_jump_hook();

        assert_eq!(collector.jumps(), &[2]);
        assert_eq!(output[2].untransformed, None);
        assert_eq!(output[2].metatransformed, None);
        let lens: Vec<_> = collector.segments(&output).iter().map(|s| s.len()).collect();
        assert_eq!(lens, [2, 1]);
    }

    #[test]
    fn segments_skip_empty_runs() {
        let mut collector = SegmentCollector::new();
        let output = vec![Coord::default(), Coord::xy(1.0, 1.0), Coord::default(), Coord::default()];
        collector.notify_jump(0, &output[0]);
        collector.notify_jump(2, &output[2]);
        collector.notify_jump(3, &output[3]);
        let segments = collector.segments(&output);
        assert_eq!(segments.len(), 1);
        assert_eq!(serialize_coords(segments[0], &PlainNumberFormat), "{;1,1,}");
    }

    #[test]
    fn symbolic_meta_is_not_normalized() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default())
            .unwrap()
            .with_point_meta(ExplicitSymbolic);
        handler.survey_start().unwrap();
        handler
            .survey_point(&mut axis, RawRecord::xy(1.0, 2.0).with_meta("blue"))
            .unwrap();
        axis.survey_to_pgfplots(&mut handler, &PlainNumberFormat).unwrap();
        handler.visualization_phase_init(&axis).unwrap();

        let output = PlotVisualizer::new(&axis, &mut handler)
            .get_visualization_output()
            .unwrap();
        assert_eq!(output[0].metatransformed, None);
        assert_eq!(output[0].meta, Some(MetaValue::Symbolic("blue".to_string())));
        assert_eq!(serialize_coords(&output, &PlainNumberFormat), "{blue;1,2,}");
    }

    #[test]
    fn requires_visualization_phase() {
        let axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default()).unwrap();
        let err = PlotVisualizer::new(&axis, &mut handler)
            .get_visualization_output()
            .unwrap_err();
        assert!(matches!(err, SurveyError::PhaseViolation { .. }));
    }
}
