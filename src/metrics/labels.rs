//! Label types for Prometheus metrics

use prometheus_client::encoding::EncodeLabelSet;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct CorsLabels {
    pub kind: String,
    pub outcome: String,
}

impl CorsLabels {
    pub fn new(preflight: bool, granted: bool) -> Self {
        CorsLabels {
            kind: if preflight { "preflight" } else { "actual" }.to_string(),
            outcome: if granted { "granted" } else { "denied" }.to_string(),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct BuildInfoLabels {
    pub version: String,
}
