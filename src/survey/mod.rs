//! The survey engine
//!
//! A [`Plothandler`] consumes one plot's raw records in order, with the
//! help of the shared [`Axis`](axis::Axis), and afterwards normalizes
//! point meta for the visualization pass.

pub mod advisory;
pub mod axis;
pub mod config;
pub mod context;
pub mod defaults;
pub mod eval;
pub mod filter;
pub mod hooks;
pub mod meta;
pub mod serialize;
pub mod visualizer;

use std::fmt;

use crate::errors::SurveyError;
use crate::log::debug;
use crate::map::PointMetaMap;
use crate::types::{Coord, MetaValue, RawRecord};

use advisory::Advisory;
use axis::Axis;
use config::{PlothandlerConfig, PointMetaRel};
use context::PointContext;
use defaults::{FALLBACK_META_DOMAIN, NEUTRAL_META};
use filter::PointFilter;
use hooks::{DefaultHooks, SurveyHooks};
use meta::{AssignMeta, PointMetaHandler};

/// Lifecycle of a plot handler. Phases only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyPhase {
    Constructed,
    SurveyActive,
    SurveyDone,
    VisualizationReady,
}

impl fmt::Display for SurveyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SurveyPhase::Constructed => "constructed",
            SurveyPhase::SurveyActive => "survey active",
            SurveyPhase::SurveyDone => "survey done",
            SurveyPhase::VisualizationReady => "visualization ready",
        })
    }
}

/// Survey state of one plot
pub struct Plothandler<H: SurveyHooks = DefaultHooks> {
    config: PlothandlerConfig,
    hooks: H,
    pointmetainputhandler: Option<PointMetaHandler>,
    filter: Option<Box<dyn PointFilter>>,
    coords: Vec<Coord>,
    coordindex: usize,
    /// `+inf`/`-inf` until the first numeric meta, unless fixed
    metamin: f64,
    metamax: f64,
    autocompute_meta_min: bool,
    autocompute_meta_max: bool,
    pointmetamap: Option<PointMetaMap>,
    filtered_coords_away: bool,
    plot_has_jumps: bool,
    phase: SurveyPhase,
    advisories: Vec<Advisory>,
}

impl Plothandler<DefaultHooks> {
    pub fn new(config: PlothandlerConfig) -> Result<Self, SurveyError> {
        Self::with_hooks(config, DefaultHooks)
    }
}

impl<H: SurveyHooks> Plothandler<H> {
    /// Build a specialized handler
    pub fn with_hooks(config: PlothandlerConfig, hooks: H) -> Result<Self, SurveyError> {
        config.validate()?;
        Ok(Self {
            metamin: config.meta_min.unwrap_or(f64::INFINITY),
            metamax: config.meta_max.unwrap_or(f64::NEG_INFINITY),
            autocompute_meta_min: config.meta_min.is_none(),
            autocompute_meta_max: config.meta_max.is_none(),
            config,
            hooks,
            pointmetainputhandler: None,
            filter: None,
            coords: Vec::new(),
            coordindex: 0,
            pointmetamap: None,
            filtered_coords_away: false,
            plot_has_jumps: false,
            phase: SurveyPhase::Constructed,
            advisories: Vec::new(),
        })
    }

    /// Attach a point meta strategy
    pub fn with_point_meta(mut self, handler: impl Into<PointMetaHandler>) -> Self {
        self.pointmetainputhandler = Some(handler.into());
        self
    }

    /// Attach a coordinate filter; filtered points are always discarded
    pub fn with_filter(mut self, filter: impl PointFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    fn expect_phase(&self, expected: SurveyPhase, operation: &'static str) -> Result<(), SurveyError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SurveyError::PhaseViolation {
                operation,
                phase: self.phase,
            })
        }
    }

    pub fn survey_start(&mut self) -> Result<(), SurveyError> {
        self.expect_phase(SurveyPhase::Constructed, "survey_start")?;
        debug!(plot_type = %self.config.plot_type, "survey start");
        self.phase = SurveyPhase::SurveyActive;
        Ok(())
    }

    /// Survey one raw record.
    ///
    /// Every record consumes one `coordindex` slot, whether or not it ends
    /// up in the surveyed sequence. A fatal error leaves the index where
    /// it was.
    pub fn survey_point(&mut self, axis: &mut Axis, raw: RawRecord) -> Result<(), SurveyError> {
        self.expect_phase(SurveyPhase::SurveyActive, "survey_point")?;

        let explicit = self
            .pointmetainputhandler
            .as_ref()
            .is_some_and(AssignMeta::explicit_input);
        if explicit && raw.meta.is_none() {
            debug!(coordindex = self.coordindex, "record has no explicit point meta");
        }

        let mut pt = axis.parse_coordinate(raw);
        if pt.is_valid() {
            self.apply_filter(&mut pt)?;
        }
        if pt.is_valid() {
            axis.update_limits_for_coordinate(&pt);
        }
        axis.datapoint_surveyed(pt, self)?;

        self.coordindex += 1;
        Ok(())
    }

    fn apply_filter(&self, pt: &mut Coord) -> Result<(), SurveyError> {
        let Some(filter) = &self.filter else {
            return Ok(());
        };
        let discard = filter
            .discard(&PointContext::for_point(pt))
            .map_err(|e| SurveyError::RejectedExpression {
                expr: filter.describe(),
                reason: e.to_string(),
            })?;
        if discard {
            pt.invalidate();
            pt.unbounded_dir = None;
        }
        Ok(())
    }

    /// End the survey and run the `survey_end` hook.
    ///
    /// Normally called through [`Axis::survey_to_pgfplots`].
    pub fn survey_end(&mut self) -> Result<(), SurveyError> {
        self.expect_phase(SurveyPhase::SurveyActive, "survey_end")?;
        self.phase = SurveyPhase::SurveyDone;
        self.hooks.survey_end(&mut self.coords);
        debug!(
            coordindex = self.coordindex,
            surveyed = self.coords.len(),
            "survey end"
        );
        Ok(())
    }

    /// Run the meta strategy on `pt` unless it already has a meta
    pub fn set_per_point_meta(&self, pt: &mut Coord) -> Result<(), SurveyError> {
        match &self.pointmetainputhandler {
            Some(handler) if pt.meta.is_none() => handler.assign(pt),
            _ => Ok(()),
        }
    }

    /// Fold the meta of `pt` into this plot's meta extents.
    ///
    /// Fixed bounds stay put independently of each other. Non-finite metas
    /// are left to the normalization step.
    pub fn set_per_point_meta_limits(&mut self, pt: &Coord) -> Result<(), SurveyError> {
        if self.is_symbolic_meta() {
            return Ok(());
        }
        let value = match &pt.meta {
            None => return Ok(()),
            Some(MetaValue::Number(n)) => *n,
            Some(MetaValue::Symbolic(s)) => {
                return Err(SurveyError::UnparsedMeta { value: s.clone() });
            }
        };
        if !value.is_finite() {
            return Ok(());
        }
        if self.autocompute_meta_min {
            self.metamin = self.metamin.min(value);
        }
        if self.autocompute_meta_max {
            self.metamax = self.metamax.max(value);
        }
        Ok(())
    }

    /// Build the meta normalization from the final meta extents.
    ///
    /// Under [`PointMetaRel::AxisWide`] every plot on `axis` must have ended
    /// its survey first. Without numeric meta the domain falls back to
    /// `[0, 1]`; a single-valued domain is widened by one.
    pub fn visualization_phase_init(&mut self, axis: &Axis) -> Result<(), SurveyError> {
        self.expect_phase(SurveyPhase::SurveyDone, "visualization_phase_init")?;

        let numeric = self
            .pointmetainputhandler
            .as_ref()
            .is_some_and(|h| !h.is_symbolic());
        if numeric {
            let limits = match self.config.point_meta_rel {
                PointMetaRel::AxisWide => axis.axis_wide_meta_limits(),
                PointMetaRel::PerPlot => self.meta_limits(),
            };
            let (lo, hi) = limits.unwrap_or(FALLBACK_META_DOMAIN);
            let hi = if lo == hi { lo + 1.0 } else { hi };
            self.pointmetamap = Some(PointMetaMap::new(lo, hi)?);
        }

        self.phase = SurveyPhase::VisualizationReady;
        Ok(())
    }

    /// Normalize one meta value; absent metas become the neutral value
    pub fn visualization_transform_meta(&mut self, meta: Option<f64>) -> Result<f64, SurveyError> {
        self.expect_phase(SurveyPhase::VisualizationReady, "visualization_transform_meta")?;
        let Some(meta) = meta else {
            advisory::record(
                &mut self.advisories,
                Advisory::MissingMeta {
                    neutral: NEUTRAL_META,
                },
            );
            return Ok(NEUTRAL_META);
        };
        Ok(match &mut self.pointmetamap {
            Some(map) => map.map(meta),
            None => NEUTRAL_META,
        })
    }

    pub(crate) fn survey_before_set_point_meta(&mut self, pt: &mut Coord) {
        self.hooks.before_set_point_meta(pt);
    }

    pub(crate) fn survey_after_set_point_meta(&mut self, pt: &mut Coord) {
        self.hooks.after_set_point_meta(pt);
    }

    pub(crate) fn add_surveyed_point(&mut self, pt: Coord) {
        self.coords.push(pt);
    }

    pub(crate) fn advise(&mut self, advisory: Advisory) {
        advisory::record(&mut self.advisories, advisory);
    }

    /// The surveyed sequence, jump sentinels included
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    /// Number of records surveyed so far
    pub fn coordindex(&self) -> usize {
        self.coordindex
    }

    pub fn metamin(&self) -> Option<f64> {
        Some(self.metamin).filter(|v| v.is_finite())
    }

    pub fn metamax(&self) -> Option<f64> {
        Some(self.metamax).filter(|v| v.is_finite())
    }

    /// This plot's meta extents, once both ends are known
    pub fn meta_limits(&self) -> Option<(f64, f64)> {
        Some((self.metamin()?, self.metamax()?))
    }

    pub fn filtered_coords_away(&self) -> bool {
        self.filtered_coords_away
    }

    pub fn plot_has_jumps(&self) -> bool {
        self.plot_has_jumps
    }

    pub fn config(&self) -> &PlothandlerConfig {
        &self.config
    }

    pub fn point_meta(&self) -> Option<&PointMetaHandler> {
        self.pointmetainputhandler.as_ref()
    }

    /// Whether the attached strategy produces symbolic meta
    pub fn is_symbolic_meta(&self) -> bool {
        self.pointmetainputhandler
            .as_ref()
            .is_some_and(AssignMeta::is_symbolic)
    }

    pub fn point_meta_map(&self) -> Option<&PointMetaMap> {
        self.pointmetamap.as_ref()
    }

    pub fn phase(&self) -> SurveyPhase {
        self.phase
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Advisories raised by this plot, including those of its meta map
    pub fn advisories(&self) -> impl Iterator<Item = &Advisory> + '_ {
        self.advisories.iter().chain(
            self.pointmetamap
                .iter()
                .flat_map(|map| map.advisories().iter()),
        )
    }
}

impl<H: SurveyHooks> fmt::Debug for Plothandler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plothandler")
            .field("config", &self.config)
            .field("point_meta", &self.pointmetainputhandler)
            .field("has_filter", &self.filter.is_some())
            .field("coords", &self.coords)
            .field("coordindex", &self.coordindex)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::advisory::DropCause;
    use crate::survey::config::{AxisConfig, UnboundedCoords};
    use crate::survey::meta::{Explicit, ExplicitSymbolic};
    use crate::survey::serialize::{PlainNumberFormat, serialize_coords};
    use crate::types::Dir;

    fn run<H: SurveyHooks>(axis: &mut Axis, handler: &mut Plothandler<H>, records: Vec<RawRecord>) {
        handler.survey_start().unwrap();
        for raw in records {
            handler.survey_point(axis, raw).unwrap();
        }
        axis.survey_to_pgfplots(handler, &PlainNumberFormat).unwrap();
    }

    fn stream() -> Vec<RawRecord> {
        vec![
            RawRecord::xy(1.0, 2.0),
            RawRecord::xy(3.0, f64::NAN),
            RawRecord::xy(5.0, 6.0),
        ]
    }

    #[test]
    fn discard_policy_drops_invalid_points() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default()).unwrap();
        run(&mut axis, &mut handler, stream());

        let xs: Vec<_> = handler.coords().iter().map(|c| c.x).collect();
        assert_eq!(xs, [[Some(1.0), Some(2.0), None], [Some(5.0), Some(6.0), None]]);
        assert_eq!(serialize_coords(handler.coords(), &PlainNumberFormat), "{;1,2,}{;5,6,}");
        assert!(handler.filtered_coords_away());
        assert!(!handler.plot_has_jumps());
        assert_eq!(handler.coordindex(), 3);
        assert_eq!((axis.min(Dir::X), axis.min(Dir::Y)), (Some(1.0), Some(2.0)));
        assert_eq!((axis.max(Dir::X), axis.max(Dir::Y)), (Some(5.0), Some(6.0)));

        let advisories: Vec<_> = handler.advisories().collect();
        assert_eq!(advisories.len(), 1);
        match advisories[0] {
            Advisory::Dropped { coordindex, cause, point, .. } => {
                assert_eq!(*coordindex, 1);
                assert_eq!(*cause, DropCause::Unbounded(Dir::Y));
                assert_eq!(point, "(3, NaN, --)");
            }
            other => panic!("unexpected advisory {:?}", other),
        }
    }

    #[test]
    fn every_discarded_point_is_reported() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default()).unwrap();
        run(
            &mut axis,
            &mut handler,
            vec![
                RawRecord::xy(1.0, 2.0),
                RawRecord::xy(3.0, "nan"),
                RawRecord::xy("inf", 4.0),
                RawRecord::xy(5.0, 6.0),
            ],
        );

        let dropped: Vec<_> = handler
            .advisories()
            .map(|a| match a {
                Advisory::Dropped { coordindex, cause, .. } => (*coordindex, *cause),
                other => panic!("unexpected advisory {:?}", other),
            })
            .collect();
        assert_eq!(
            dropped,
            [
                (1, DropCause::Unbounded(Dir::Y)),
                (2, DropCause::Unbounded(Dir::X)),
            ]
        );
        assert_eq!(handler.coords().len(), 2);
    }

    #[test]
    fn discard_warnings_can_be_silenced() {
        let mut axis = Axis::default();
        let config = PlothandlerConfig::default().with_discard_warnings(false);
        let mut handler = Plothandler::new(config).unwrap();
        run(&mut axis, &mut handler, stream());
        assert!(handler.filtered_coords_away());
        assert_eq!(handler.advisories().count(), 0);
    }

    #[test]
    fn jump_policy_keeps_sentinel() {
        let mut axis = Axis::default();
        let config = PlothandlerConfig::default().with_unbounded_coords(UnboundedCoords::Jump);
        let mut handler = Plothandler::new(config).unwrap();
        run(&mut axis, &mut handler, stream());

        assert_eq!(
            serialize_coords(handler.coords(), &PlainNumberFormat),
            "{;1,2,}{;,,}{;5,6,}"
        );
        assert_eq!(handler.coords()[1].unbounded_dir, Some(Dir::Y));
        assert!(handler.plot_has_jumps());
        assert!(!handler.filtered_coords_away());
        assert_eq!(handler.advisories().count(), 0);
    }

    #[test]
    fn filtered_points_are_discarded_under_jump_policy() {
        let mut axis = Axis::default();
        let config = PlothandlerConfig::default().with_unbounded_coords(UnboundedCoords::Jump);
        let mut handler = Plothandler::new(config)
            .unwrap()
            .with_filter(|ctx: &PointContext| ctx.x[0] == Some(3.0));
        run(
            &mut axis,
            &mut handler,
            vec![
                RawRecord::xy(1.0, 2.0),
                RawRecord::xy(3.0, 40.0),
                RawRecord::xy(5.0, 6.0),
            ],
        );

        assert_eq!(handler.coords().len(), 2);
        assert!(handler.filtered_coords_away());
        assert!(!handler.plot_has_jumps());
        assert_eq!(handler.coordindex(), 3);
        // filtered points never reach the extents
        assert_eq!(axis.max(Dir::Y), Some(6.0));
        assert!(matches!(
            handler.advisories().next(),
            Some(Advisory::Dropped {
                cause: DropCause::Filter,
                ..
            })
        ));
    }

    #[test]
    fn filter_evaluation_failure_is_fatal() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default())
            .unwrap()
            .with_filter(filter::DiscardIf::parse("meta").unwrap());
        handler.survey_start().unwrap();
        let err = handler
            .survey_point(&mut axis, RawRecord::xy(1.0, 2.0))
            .unwrap_err();
        assert!(matches!(err, SurveyError::RejectedExpression { .. }));
        assert_eq!(handler.coordindex(), 0);
    }

    #[test]
    fn lifecycle_is_enforced() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default()).unwrap();

        assert_eq!(
            handler.survey_point(&mut axis, RawRecord::xy(1.0, 2.0)),
            Err(SurveyError::PhaseViolation {
                operation: "survey_point",
                phase: SurveyPhase::Constructed,
            })
        );
        assert!(handler.visualization_transform_meta(Some(1.0)).is_err());

        handler.survey_start().unwrap();
        assert!(handler.survey_start().is_err());
        assert!(handler.visualization_phase_init(&axis).is_err());
        handler.survey_end().unwrap();
        assert!(handler.survey_point(&mut axis, RawRecord::xy(1.0, 2.0)).is_err());
        handler.visualization_phase_init(&axis).unwrap();
        assert_eq!(handler.phase(), SurveyPhase::VisualizationReady);
    }

    #[test]
    fn per_plot_meta_normalization() {
        let mut axis = Axis::default();
        let config = PlothandlerConfig::default().with_point_meta_rel(PointMetaRel::PerPlot);
        let mut handler = Plothandler::new(config)
            .unwrap()
            .with_point_meta(PointMetaHandler::coord(2).unwrap());
        run(
            &mut axis,
            &mut handler,
            vec![RawRecord::xy(1.0, 2.0), RawRecord::xy(5.0, 6.0)],
        );
        assert_eq!(handler.meta_limits(), Some((2.0, 6.0)));

        handler.visualization_phase_init(&axis).unwrap();
        assert_eq!(handler.visualization_transform_meta(Some(2.0)), Ok(0.0));
        assert_eq!(handler.visualization_transform_meta(Some(4.0)), Ok(500.0));
        assert_eq!(handler.visualization_transform_meta(Some(6.0)), Ok(1000.0));
        assert_eq!(handler.visualization_transform_meta(Some(60.0)), Ok(1000.0));
    }

    #[test]
    fn fixed_meta_bound_leaves_the_other_autocomputed() {
        let mut axis = Axis::default();
        let config = PlothandlerConfig::default().with_meta_limits(Some(0.0), None);
        let mut handler = Plothandler::new(config)
            .unwrap()
            .with_point_meta(PointMetaHandler::coord(2).unwrap());
        run(
            &mut axis,
            &mut handler,
            vec![RawRecord::xy(1.0, 2.0), RawRecord::xy(5.0, 6.0)],
        );
        assert_eq!(handler.meta_limits(), Some((0.0, 6.0)));
    }

    #[test]
    fn axis_wide_meta_spans_all_plots() {
        let mut axis = Axis::new(AxisConfig::default()).unwrap();
        let mut first = Plothandler::new(PlothandlerConfig::default())
            .unwrap()
            .with_point_meta(PointMetaHandler::coord(2).unwrap());
        let mut second = Plothandler::new(PlothandlerConfig::default())
            .unwrap()
            .with_point_meta(PointMetaHandler::coord(2).unwrap());

        run(&mut axis, &mut first, vec![RawRecord::xy(0.0, 0.0), RawRecord::xy(1.0, 4.0)]);
        run(&mut axis, &mut second, vec![RawRecord::xy(0.0, 8.0), RawRecord::xy(1.0, 10.0)]);
        assert_eq!(axis.axis_wide_meta_limits(), Some((0.0, 10.0)));

        second.visualization_phase_init(&axis).unwrap();
        assert_eq!(second.visualization_transform_meta(Some(10.0)), Ok(1000.0));
        assert_eq!(second.visualization_transform_meta(Some(5.0)), Ok(500.0));
    }

    #[test]
    fn axis_wide_meta_is_current_after_survey_end() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default())
            .unwrap()
            .with_point_meta(PointMetaHandler::coord(2).unwrap());
        handler.survey_start().unwrap();
        handler.survey_point(&mut axis, RawRecord::xy(1.0, 2.0)).unwrap();
        handler.survey_point(&mut axis, RawRecord::xy(1.0, 12.0)).unwrap();
        handler.survey_end().unwrap();
        assert_eq!(axis.axis_wide_meta_limits(), Some((2.0, 12.0)));

        handler.visualization_phase_init(&axis).unwrap();
        assert_eq!(handler.visualization_transform_meta(Some(7.0)), Ok(500.0));
    }

    #[test]
    fn single_valued_meta_domain_is_widened() {
        let mut axis = Axis::default();
        let config = PlothandlerConfig::default().with_point_meta_rel(PointMetaRel::PerPlot);
        let mut handler = Plothandler::new(config)
            .unwrap()
            .with_point_meta(PointMetaHandler::coord(2).unwrap());
        run(&mut axis, &mut handler, vec![RawRecord::xy(1.0, 3.0)]);

        handler.visualization_phase_init(&axis).unwrap();
        assert_eq!(handler.visualization_transform_meta(Some(3.0)), Ok(0.0));
        assert_eq!(handler.visualization_transform_meta(Some(3.5)), Ok(500.0));
    }

    #[test]
    fn missing_meta_becomes_neutral() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default())
            .unwrap()
            .with_point_meta(Explicit);
        run(&mut axis, &mut handler, vec![RawRecord::xy(1.0, 2.0)]);
        assert_eq!(handler.meta_limits(), None);

        handler.visualization_phase_init(&axis).unwrap();
        assert_eq!(handler.visualization_transform_meta(None), Ok(NEUTRAL_META));
        assert_eq!(handler.visualization_transform_meta(None), Ok(NEUTRAL_META));
        assert_eq!(
            handler
                .advisories()
                .filter(|a| matches!(a, Advisory::MissingMeta { .. }))
                .count(),
            2
        );
        // no numeric meta at all: the domain falls back to [0, 1]
        assert_eq!(handler.visualization_transform_meta(Some(0.5)), Ok(500.0));
    }

    #[test]
    fn unbounded_meta_warns_once_through_the_handler() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default())
            .unwrap()
            .with_point_meta(Explicit);
        run(
            &mut axis,
            &mut handler,
            vec![RawRecord::xy(1.0, 2.0).with_meta(1.0), RawRecord::xy(1.0, 2.0).with_meta(3.0)],
        );
        handler.visualization_phase_init(&axis).unwrap();
        assert_eq!(handler.visualization_transform_meta(Some(f64::NAN)), Ok(0.0));
        assert_eq!(handler.visualization_transform_meta(Some(f64::INFINITY)), Ok(0.0));
        assert_eq!(handler.advisories().count(), 1);
    }

    #[test]
    fn symbolic_meta_is_not_tracked() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default())
            .unwrap()
            .with_point_meta(ExplicitSymbolic);
        run(
            &mut axis,
            &mut handler,
            vec![RawRecord::xy(1.0, 2.0).with_meta("red")],
        );
        assert_eq!(handler.meta_limits(), None);
        assert_eq!(axis.axis_wide_meta_limits(), None);
        assert_eq!(
            handler.coords()[0].meta,
            Some(MetaValue::Symbolic("red".to_string()))
        );

        handler.visualization_phase_init(&axis).unwrap();
        assert!(handler.point_meta_map().is_none());
    }

    #[test]
    fn unparsable_explicit_meta_aborts_the_survey() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::new(PlothandlerConfig::default())
            .unwrap()
            .with_point_meta(Explicit);
        handler.survey_start().unwrap();
        assert_eq!(
            handler.survey_point(&mut axis, RawRecord::xy(1.0, 2.0).with_meta("red")),
            Err(SurveyError::UnparsedMeta {
                value: "red".to_string()
            })
        );
        assert!(handler.coords().is_empty());
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, Option<MetaValue>)>,
    }

    impl SurveyHooks for Recorder {
        fn before_set_point_meta(&mut self, pt: &mut Coord) {
            self.calls.push(("before", pt.meta.clone()));
        }

        fn after_set_point_meta(&mut self, pt: &mut Coord) {
            self.calls.push(("after", pt.meta.clone()));
        }

        fn survey_end(&mut self, coords: &mut Vec<Coord>) {
            self.calls.push(("end", None));
            coords.reverse();
        }
    }

    #[test]
    fn hooks_run_around_meta_assignment() {
        let mut axis = Axis::default();
        let mut handler = Plothandler::with_hooks(PlothandlerConfig::default(), Recorder::default())
            .unwrap()
            .with_point_meta(PointMetaHandler::coord(1).unwrap());
        run(
            &mut axis,
            &mut handler,
            vec![RawRecord::xy(1.0, 2.0), RawRecord::xy("nan", 2.0), RawRecord::xy(5.0, 6.0)],
        );

        let calls: Vec<_> = handler.hooks().calls.iter().map(|(c, _)| *c).collect();
        assert_eq!(calls, ["before", "after", "before", "after", "end"]);
        assert_eq!(handler.hooks().calls[0].1, None);
        assert_eq!(handler.hooks().calls[1].1, Some(MetaValue::Number(1.0)));
        // the end hook may rewrite the surveyed sequence
        assert_eq!(handler.coords()[0].x[0], Some(5.0));
    }

    #[test]
    fn rejects_nan_meta_bound() {
        let config = PlothandlerConfig::default().with_meta_limits(Some(f64::NAN), None);
        assert!(matches!(
            Plothandler::new(config),
            Err(SurveyError::MissingArgument { .. })
        ));
    }
}
