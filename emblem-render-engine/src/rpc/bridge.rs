//! Host-facing methods and notifications of the emblem.

use super::web_rpc::{RpcError, RpcRequest, RpcResponse, create_error_response};
use crate::animation::registry::AnimationRegistry;
use crate::emblem::decomposition::{DecompositionPhase, EmblemController};
use crate::emblem::events::*;
use crate::emblem::fragment::NavigationFragment;
use crate::engine::core::app_state::AppState;
use crate::engine::core::mount_flags::MountFlags;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use constants::sections::SECTION_SLOTS;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Failures of bridge methods, reported to the host as JSON-RPC errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid params for '{method}': {source}")]
    InvalidParams {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("emblem has been unmounted")]
    Unmounted,
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<BridgeError> for RpcError {
    fn from(error: BridgeError) -> Self {
        match &error {
            BridgeError::InvalidParams { .. } => RpcError::invalid_params(&error.to_string()),
            BridgeError::Unmounted => RpcError {
                code: -32000,
                message: error.to_string(),
                data: None,
            },
            BridgeError::Encode(_) => RpcError::internal_error(&error.to_string()),
        }
    }
}

/// Emblem state as seen by the bridge while it handles this frame's requests.
#[derive(Debug, Clone, Default)]
pub struct EmblemSnapshot {
    pub phase: DecompositionPhase,
    pub click_transition_active: bool,
    pub flags: MountFlags,
    pub active_animations: usize,
    /// Section ids that have a navigation fragment bound.
    pub bound_sections: Vec<&'static str>,
    pub unmounted: bool,
}

impl EmblemSnapshot {
    fn accepts_navigation(&self, section_id: &str) -> bool {
        self.phase == DecompositionPhase::Decomposed
            && !self.click_transition_active
            && self.bound_sections.contains(&section_id)
    }
}

/// Work requested by the host, turned into engine events after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCommand {
    Navigate(String),
    ResetClickTransition,
    Unmount,
}

#[derive(SystemParam)]
pub struct EmblemBridge<'w, 's> {
    controller: Res<'w, EmblemController>,
    flags: Res<'w, MountFlags>,
    registry: Res<'w, AnimationRegistry>,
    state: Res<'w, State<AppState>>,
    navigation: Query<'w, 's, &'static NavigationFragment>,
    navigate: EventWriter<'w, NavigateToSection>,
    reset: EventWriter<'w, ResetClickTransition>,
    unmount: EventWriter<'w, UnmountEmblem>,
}

impl EmblemBridge<'_, '_> {
    pub fn snapshot(&self) -> EmblemSnapshot {
        let mut bound_sections: Vec<&'static str> =
            self.navigation.iter().map(|nav| nav.section_id).collect();
        bound_sections.sort_unstable();

        EmblemSnapshot {
            phase: self.controller.phase(),
            click_transition_active: self.controller.click_transition_active(),
            flags: *self.flags,
            active_animations: self.registry.len(),
            bound_sections,
            unmounted: *self.state.get() == AppState::Unmounted,
        }
    }

    pub fn apply(&mut self, commands: Vec<BridgeCommand>) {
        for command in commands {
            match command {
                BridgeCommand::Navigate(section_id) => {
                    self.navigate.write(NavigateToSection { section_id });
                }
                BridgeCommand::ResetClickTransition => {
                    self.reset.write(ResetClickTransition);
                }
                BridgeCommand::Unmount => {
                    self.unmount.write(UnmountEmblem);
                }
            }
        }
    }
}

/// Dispatch one request against the snapshot. Notifications (no id) are
/// still executed but produce no response.
pub fn handle_rpc_request(
    request: &RpcRequest,
    snapshot: &mut EmblemSnapshot,
    commands: &mut Vec<BridgeCommand>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "navigate_to_section" => handle_navigate_to_section(&request.params, snapshot, commands),
        "reset_click_transition" => handle_reset_click_transition(snapshot, commands),
        "get_emblem_state" => handle_get_emblem_state(snapshot),
        "get_sections" => handle_get_sections(snapshot),
        "unmount" => handle_unmount(snapshot, commands),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(json!({ "method": request.method })),
            ));
        }
    };

    let id = request.id.clone()?;
    Some(match result {
        Ok(value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error.into()),
            id: Some(id),
        },
    })
}

fn handle_navigate_to_section(
    params: &Value,
    snapshot: &mut EmblemSnapshot,
    commands: &mut Vec<BridgeCommand>,
) -> Result<Value, BridgeError> {
    #[derive(Deserialize)]
    struct NavigateParams {
        section_id: String,
    }

    let params = serde_json::from_value::<NavigateParams>(params.clone()).map_err(|source| {
        BridgeError::InvalidParams {
            method: "navigate_to_section",
            source,
        }
    })?;
    if snapshot.unmounted {
        return Err(BridgeError::Unmounted);
    }

    let accepted = snapshot.accepts_navigation(&params.section_id);
    if accepted {
        // A second request in the same batch must see the dive as started.
        snapshot.click_transition_active = true;
        commands.push(BridgeCommand::Navigate(params.section_id));
    } else {
        debug!("navigate_to_section '{}' not accepted", params.section_id);
    }

    Ok(json!({ "accepted": accepted }))
}

fn handle_reset_click_transition(
    snapshot: &mut EmblemSnapshot,
    commands: &mut Vec<BridgeCommand>,
) -> Result<Value, BridgeError> {
    if snapshot.unmounted {
        return Err(BridgeError::Unmounted);
    }
    let was_active = std::mem::replace(&mut snapshot.click_transition_active, false);
    commands.push(BridgeCommand::ResetClickTransition);
    Ok(json!({ "was_active": was_active }))
}

#[derive(Serialize)]
struct EmblemStateReport {
    phase: DecompositionPhase,
    click_transition_active: bool,
    reduced_motion: bool,
    coarse_pointer: bool,
    active_animations: usize,
    unmounted: bool,
}

fn handle_get_emblem_state(snapshot: &EmblemSnapshot) -> Result<Value, BridgeError> {
    let report = EmblemStateReport {
        phase: snapshot.phase,
        click_transition_active: snapshot.click_transition_active,
        reduced_motion: snapshot.flags.reduced_motion,
        coarse_pointer: snapshot.flags.coarse_pointer,
        active_animations: snapshot.active_animations,
        unmounted: snapshot.unmounted,
    };
    Ok(serde_json::to_value(report)?)
}

#[derive(Serialize)]
struct SectionReport {
    slot: usize,
    section_id: &'static str,
    label: &'static str,
    target_position: [f32; 3],
    bound: bool,
}

fn handle_get_sections(snapshot: &EmblemSnapshot) -> Result<Value, BridgeError> {
    let sections: Vec<SectionReport> = SECTION_SLOTS
        .iter()
        .enumerate()
        .map(|(slot, section)| SectionReport {
            slot,
            section_id: section.section_id,
            label: section.label,
            target_position: section.target_position.to_array(),
            bound: snapshot.bound_sections.contains(&section.section_id),
        })
        .collect();
    Ok(json!({ "sections": serde_json::to_value(sections)? }))
}

fn handle_unmount(
    snapshot: &mut EmblemSnapshot,
    commands: &mut Vec<BridgeCommand>,
) -> Result<Value, BridgeError> {
    if snapshot.unmounted {
        return Ok(json!({ "unmounted": true, "cancelled": 0 }));
    }
    let cancelled = snapshot.active_animations;
    snapshot.unmounted = true;
    snapshot.active_animations = 0;
    commands.push(BridgeCommand::Unmount);
    Ok(json!({ "unmounted": true, "cancelled": cancelled }))
}

/// Params of the `navigation_hover` notification, all null on leave.
pub fn hover_notification(event: &NavigationHovered) -> Value {
    match &event.0 {
        Some(report) => json!({
            "fragment_id": report.fragment_id,
            "label": report.label,
            "position": report.position.map(|p| json!({ "x": p.x, "y": p.y })),
        }),
        None => json!({
            "fragment_id": null,
            "label": null,
            "position": null,
        }),
    }
}
