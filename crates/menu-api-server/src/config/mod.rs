pub mod settings;

pub use settings::{
    FeatureConfig, FirestoreConfig, FranchiseConfig, LoggingConfig, ServerConfig, SessionConfig,
    Settings,
};
