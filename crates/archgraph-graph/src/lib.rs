//! Reference collaborators for the ArchGraph analysis service.
//!
//! Each type here implements one of the ports declared in `archgraph-core`:
//! [`FsGraphLoader`] reads a source tree, [`ModuleProjectionStrategy`]
//! aggregates it into modules, and the view builder, layout engine and
//! exporters turn a projection into a renderable document.

pub mod exporters;
pub mod layout;
pub mod loader;
pub mod projection;
pub mod view;

pub use exporters::{GraphMlExporter, JsonGraphExporter, SvgGraphExporter};
pub use layout::LayeredLayoutEngine;
pub use loader::FsGraphLoader;
pub use projection::ModuleProjectionStrategy;
pub use view::DefaultGraphViewBuilder;
