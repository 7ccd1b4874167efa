//! Release lookup: which build to deploy and where to download it.

pub mod resolver;
pub mod tag;

pub use resolver::{
    FixedRelease, GitHubReleases, ReleaseSource, artifact_url, parse_latest_release,
};
pub use tag::ReleaseTag;
