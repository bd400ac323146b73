//! Ports: the contracts between the pipeline core and its
//! collaborators. Pure computation ports are plain traits; anything
//! that may touch a backend is `async_trait`.

mod cleaning;
mod ingestor;
mod repositories;

pub use cleaning::{IAligner, ICleaningRule, IRuleFactory, ISanitizer, IUnifier};
pub use ingestor::{IIngestor, IReadingSink};
pub use repositories::{
    ICleaningRuleRepository, IQuarantineRepository, IStandardReadingRepository, UpsertStrategy,
};
