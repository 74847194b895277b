//! Extension points for plot handler specializations

use crate::types::Coord;

/// Survey hooks a specialized plot handler may implement.
///
/// The axis calls the meta hooks around meta assignment for every valid
/// point, in the order `before_set_point_meta`, meta assignment, meta limit
/// tracking, `after_set_point_meta`.
pub trait SurveyHooks {
    fn before_set_point_meta(&mut self, _pt: &mut Coord) {}

    fn after_set_point_meta(&mut self, _pt: &mut Coord) {}

    /// Runs once when the survey ends, with the complete surveyed sequence
    fn survey_end(&mut self, _coords: &mut Vec<Coord>) {}
}

/// The plain plot handler: no extra behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultHooks;

impl SurveyHooks for DefaultHooks {}
