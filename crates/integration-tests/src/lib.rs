//! Shared fixtures for the end-to-end tests.

use ag_core::{CommunityService, CreateCommunity, MemberId, RegisterMember};
use ag_engine::{CommunityEngine, EngineConfig, EngineHandle, OrphanThreadPolicy};

pub fn engine() -> EngineHandle {
    engine_with(OrphanThreadPolicy::Reject)
}

pub fn engine_with(orphan_threads: OrphanThreadPolicy) -> EngineHandle {
    let config = EngineConfig {
        orphan_threads,
        ..EngineConfig::default()
    };
    CommunityEngine::spawn(&config).0
}

pub async fn member(engine: &EngineHandle, username: &str) -> MemberId {
    engine
        .register_member(RegisterMember::new(username, format!("{username}-secret")))
        .await
        .expect("registration never fails on a running engine")
}

pub async fn community(engine: &EngineHandle, name: &str, founder: Option<MemberId>) -> String {
    engine
        .create_community(CreateCommunity {
            name: name.to_string(),
            description: format!("All about {name}"),
            founder_id: founder,
        })
        .await
        .expect("community should be created")
}
