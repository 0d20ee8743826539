use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{Roadmap, RoadmapStep};
use crate::domain::entities::Material;
use crate::domain::value_objects::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub required_bricks: u64,
    /// May exceed `required_bricks`; overruns are reported, not clamped
    pub used_bricks: u64,
    pub start_date: String,
    pub end_date: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub assigned_bricklayers: Vec<EntityId>,
    pub manager_id: EntityId,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub roadmap: Roadmap,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub revenue: f64,
}

/// Creation data. Leaving `roadmap` empty gives the standard phases.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub address: String,
    pub description: String,
    pub required_bricks: u64,
    pub used_bricks: u64,
    pub start_date: String,
    pub end_date: String,
    pub status: ProjectStatus,
    pub assigned_bricklayers: Vec<EntityId>,
    pub manager_id: EntityId,
    pub materials: Vec<Material>,
    pub roadmap: Vec<RoadmapStep>,
    pub estimated_cost: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub required_bricks: Option<u64>,
    pub used_bricks: Option<u64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<ProjectStatus>,
    pub assigned_bricklayers: Option<Vec<EntityId>>,
    pub manager_id: Option<EntityId>,
    pub materials: Option<Vec<Material>>,
    /// Ignored when empty
    pub roadmap: Option<Vec<RoadmapStep>>,
    pub estimated_cost: Option<f64>,
    pub revenue: Option<f64>,
}

impl Project {
    pub fn new(id: EntityId, new: NewProject) -> Self {
        Self {
            id,
            name: new.name,
            address: new.address,
            description: new.description,
            required_bricks: new.required_bricks,
            used_bricks: new.used_bricks,
            start_date: new.start_date,
            end_date: new.end_date,
            status: new.status,
            assigned_bricklayers: new.assigned_bricklayers,
            manager_id: new.manager_id,
            materials: new.materials,
            roadmap: Roadmap::from_steps(new.roadmap),
            estimated_cost: new.estimated_cost,
            revenue: new.revenue,
        }
    }

    pub fn apply(&mut self, patch: &ProjectPatch) {
        if let Some(v) = &patch.name {
            self.name = v.clone();
        }
        if let Some(v) = &patch.address {
            self.address = v.clone();
        }
        if let Some(v) = &patch.description {
            self.description = v.clone();
        }
        if let Some(v) = patch.required_bricks {
            self.required_bricks = v;
        }
        if let Some(v) = patch.used_bricks {
            self.used_bricks = v;
        }
        if let Some(v) = &patch.start_date {
            self.start_date = v.clone();
        }
        if let Some(v) = &patch.end_date {
            self.end_date = v.clone();
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = &patch.assigned_bricklayers {
            self.assigned_bricklayers = v.clone();
        }
        if let Some(v) = &patch.manager_id {
            self.manager_id = v.clone();
        }
        if let Some(v) = &patch.materials {
            self.materials = v.clone();
        }
        if let Some(steps) = patch.roadmap.as_ref().filter(|s| !s.is_empty()) {
            self.roadmap = Roadmap::from_steps(steps.clone());
        }
        if let Some(v) = patch.estimated_cost {
            self.estimated_cost = v;
        }
        if let Some(v) = patch.revenue {
            self.revenue = v;
        }
    }

    pub fn is_assigned(&self, bricklayer_id: &EntityId) -> bool {
        self.assigned_bricklayers.contains(bricklayer_id)
    }

    pub fn bricks_remaining(&self) -> u64 {
        self.required_bricks.saturating_sub(self.used_bricks)
    }

    /// Bricks used beyond the requirement
    pub fn brick_overrun(&self) -> u64 {
        self.used_bricks.saturating_sub(self.required_bricks)
    }

    pub fn margin(&self) -> f64 {
        self.revenue - self.estimated_cost
    }

    /// True when both dates parse and the end precedes the start. Dates are
    /// stored as given; this is only used for diagnostics.
    pub fn schedule_is_inverted(&self) -> bool {
        match (parse_iso_date(&self.start_date), parse_iso_date(&self.end_date)) {
            (Some(start), Some(end)) => end < start,
            _ => false,
        }
    }
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
