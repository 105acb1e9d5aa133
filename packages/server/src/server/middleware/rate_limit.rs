// Rate limiting using tower-governor
//
// Configuration:
// - One request replenished every 100ms per client (10/s) with bursts up to 20
// - Applies to the OTP and login routes under /api
// - Client key from X-Forwarded-For / X-Real-IP / Forwarded, falling back to the
//   peer address (requires serving with connect info)
// - Responses carry x-ratelimit-* headers

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};

/// Wrap the router in a per-client rate limiter
pub fn with_rate_limit(router: Router) -> Result<Router> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_millisecond(100)
        .burst_size(20)
        .use_headers()
        .finish()
        .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?;

    Ok(router.layer(GovernorLayer {
        config: Arc::new(config),
    }))
}
