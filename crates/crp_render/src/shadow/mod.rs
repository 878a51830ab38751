//! Directional Shadow Mapping
//!
//! Cascaded shadow maps for up to four directional lights, packed into one
//! square depth atlas.
//!
//! # Architecture
//!
//! - **Settings**: designer-authored atlas, filter and cascade configuration
//! - **Atlas**: tile layout of the shared atlas
//! - **Cascade**: world-to-atlas matrices and cascade culling data
//! - **Reservation**: per-light outcome and its packed shader vector
//! - **Data**: GPU-ready uniform block mirroring the published globals
//! - **Shadows**: the per-frame owner tying the above together
//!
//! # Usage
//!
//! ```ignore
//! let mut shadows = Shadows::new();
//! shadows.setup(&settings, ShadowMaskMode::DistanceShadowmask);
//! for (index, light) in culling.visible_lights.iter().enumerate() {
//!     let reservation = shadows.reserve_directional_shadow(ctx, &culling, light, index);
//! }
//! shadows.render(ctx, &culling);
//! // lit draws sample the atlas here
//! shadows.cleanup(ctx);
//! ```

pub mod settings;
pub mod atlas;
pub mod cascade;
pub mod reservation;
pub mod data;
pub mod shadows;

pub use settings::{
    AtlasSize,
    CascadeBlendMode,
    DirectionalShadowSettings,
    FilterMode,
    ShadowMaskMode,
    ShadowSettings,
    MAX_CASCADES,
};

pub use atlas::{split_for, AtlasLayout, MAX_SHADOWED_DIRECTIONAL_LIGHTS, MAX_TILES};

pub use cascade::{convert_to_atlas_matrix, CascadeCullingData};

pub use reservation::{ShadowReservation, ShadowedDirectionalLight, NO_MASK_CHANNEL};

pub use data::DirectionalShadowUniforms;

pub use shadows::Shadows;
