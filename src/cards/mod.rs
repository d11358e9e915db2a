//! Card system: definitions, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardDefinition`: Printed card data, shared by `Arc`
//! - `CardInstance`: Runtime card state (zone, controller, damage, abilities)
//! - `CardCatalog`: Definition lookup, built once by the host
//! - `Params`: Typed parameters for ability and effect descriptors

pub mod definition;
pub mod instance;
pub mod params;
pub mod registry;

pub use definition::{AbilityDescriptor, CardDefinition, CardId, CardType, EffectDescriptor, Keyword};
pub use instance::{CardInstance, Characteristics, MINUS_ONE, PLUS_ONE};
pub use params::{ParamValue, Params};
pub use registry::CardCatalog;
