// src/presentation/http/middleware/rate_limit.rs
use crate::config::RateLimitSettings;
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

pub type OAuthRateLimitLayer = GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>;

/// Per-client-IP limiter for the OAuth endpoints. `None` when disabled or
/// when the settings describe an empty quota.
pub fn rate_limit_layer(settings: RateLimitSettings) -> Option<OAuthRateLimitLayer> {
    if !settings.enabled {
        return None;
    }

    let mut builder = GovernorConfigBuilder::default();
    builder.per_millisecond(settings.replenish_interval_ms);
    builder.burst_size(settings.burst);
    let Some(config) = builder.key_extractor(SmartIpKeyExtractor).finish() else {
        tracing::warn!(
            replenish_interval_ms = settings.replenish_interval_ms,
            burst = settings.burst,
            "invalid rate limit settings; limiter disabled"
        );
        return None;
    };

    Some(GovernorLayer::new(config))
}
