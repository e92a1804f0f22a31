//! Container app manifests
//!
//! This module turns manifest text (YAML or JSON) into a structured
//! [`ManifestDocument`], addresses values inside it with [`FieldPath`], and
//! offers typed builders ([`ContainerAppSpec`]) for producing manifests
//! without text templating.
//!
//! The module is organized into:
//! - `document`: parsing, field access and serialization
//! - `path`: dotted/indexed field paths and `PATH=VALUE` assignments
//! - `schema`: typed manifest structs mirroring the wire schema
//! - `file`: manifest files removed when dropped

pub mod document;
pub mod file;
pub mod path;
pub mod schema;

pub use document::{ManifestDocument, ManifestFormat};
pub use file::ScopedManifestFile;
pub use path::{parse_assignment, FieldPath, Segment};
pub use schema::{
    Configuration, Container, ContainerAppSpec, ContainerResources, EnvironmentVar, HttpScaleRule,
    Ingress, IpSecurityRestriction, ManagedIdentity, PortMapping, Properties, Scale, ScaleRule,
    ScaleRuleAuth, Template, TrafficWeight, UserAssignedIdentity,
};
