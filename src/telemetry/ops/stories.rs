use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Stories;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Fetch, Parse, Render }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Fetch => "fetch",
        Phase::Parse => "parse",
        Phase::Render => "render",
    }}
    fn span(&self) -> Span { match self {
        Phase::Fetch => info_span!("fetch"),
        Phase::Parse => info_span!("parse"),
        Phase::Render => info_span!("render"),
    }}
}

impl OpMarker for Stories {
    const NAME: &'static str = "stories";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("stories") }
}
