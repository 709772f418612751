//! Session-level orchestration of tool use and crop growth.
//!
//! [`FarmEngine`] is the authoritative reducer for [`GameSession`]. A tool use
//! runs through two phases:
//!
//! 1. `pre_validate` - bounds, energy, and tile/seed preconditions, in that
//!    order. Any failure returns a [`ToolError`] with the session untouched.
//! 2. `apply` - mutates the tile through [`rules::apply`] and settles
//!    resources. Cannot fail once validation passed.
//!
//! Engine methods never suspend and never read a clock, so a caller that
//! serializes calls per session gets all-or-nothing mutations for free.

use crate::action::{Tool, ToolError, ToolUse, ToolUseResult, rules};
use crate::error::ErrorContext;
use crate::state::{CameraDelta, GameSession, Timestamp};

/// Mutating view over one session.
pub struct FarmEngine<'a> {
    session: &'a mut GameSession,
}

impl<'a> FarmEngine<'a> {
    pub fn new(session: &'a mut GameSession) -> Self {
        Self { session }
    }

    /// Attempts `request` against the session's farm.
    pub fn use_tool(
        &mut self,
        request: ToolUse,
        now: Timestamp,
    ) -> Result<ToolUseResult, ToolError> {
        let cost = self.pre_validate(request)?;
        Ok(self.apply(request, cost, now))
    }

    fn pre_validate(&self, request: ToolUse) -> Result<u32, ToolError> {
        let ToolUse { tool, target } = request;
        let session = &*self.session;
        let context = ErrorContext::new(session.resources.day)
            .with_tool(tool)
            .with_position(target);

        let Some(tile) = session.farm.tile(target) else {
            return Err(ToolError::InvalidCoordinates {
                position: target,
                width: session.farm.width(),
                height: session.farm.height(),
                context,
            });
        };

        let cost = rules::energy_cost(tool);
        if session.resources.energy < cost {
            return Err(ToolError::InsufficientEnergy {
                tool,
                required: cost,
                available: session.resources.energy,
                context,
            });
        }

        let has_seed = tool != Tool::Plant || session.resources.seeds > 0;
        if !has_seed || !rules::can_apply(tile, tool) {
            let context = if has_seed {
                context
            } else {
                context.with_message("no seeds left")
            };
            return Err(ToolError::ToolNotApplicable {
                tool,
                position: target,
                context,
            });
        }

        Ok(cost)
    }

    fn apply(&mut self, request: ToolUse, cost: u32, now: Timestamp) -> ToolUseResult {
        let ToolUse { tool, target } = request;
        let mutation = rules::apply(self.session.farm.tile_at(target), tool, now);
        debug_assert!(mutation.applied, "validated tool use must apply");
        if !mutation.applied {
            return ToolUseResult::default();
        }

        let resources = &mut self.session.resources;
        resources.energy -= cost;
        resources.current_tool = tool;
        match tool {
            Tool::Plant => resources.seeds -= 1,
            Tool::Harvest => resources.money += mutation.harvest_value,
            Tool::Till | Tool::Water => {}
        }

        ToolUseResult {
            applied: true,
            energy_cost: cost,
            harvest_value: mutation.harvest_value,
        }
    }

    /// Runs one growth tick across the farm. Returns how many crops moved up
    /// a stage.
    pub fn advance_crops(&mut self) -> usize {
        self.session.farm.advance_all_growth()
    }

    /// Merges `delta` into the camera offset. Any value is accepted, including
    /// offsets that pan the farm entirely off-screen.
    pub fn update_camera(&mut self, delta: CameraDelta) {
        if let Some(x) = delta.x {
            self.session.camera.x = x;
        }
        if let Some(y) = delta.y {
            self.session.camera.y = y;
        }
    }

    /// Changes the held tool without using it.
    pub fn select_tool(&mut self, tool: Tool) {
        self.session.resources.current_tool = tool;
    }

    /// Ends the day: the counter advances and energy refills.
    pub fn rest(&mut self) {
        let resources = &mut self.session.resources;
        resources.day = resources.day.saturating_add(1);
        resources.energy = resources.max_energy;
    }
}
