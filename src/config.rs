//! Planner configuration.
//!
//! `PlannerConfig` holds every read-only table the pipeline consults: the role
//! lookup table, deliverable templates, base rates, hourly rates, and the
//! per-token price. It is parsed and validated once by a loader and then passed
//! by reference into each stage; no stage reads files or the environment.

use crate::core::{Role, RoleRule, TaskKind};
use crate::planning::roles::check_rules;
use crate::{Error, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default price per token (USD 0.15 per million tokens).
pub const DEFAULT_PER_TOKEN_RATE: f64 = 0.150 / 1_000_000.0;

/// Working hours in one calendar day of the schedule.
pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

/// One step of a deliverable decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStep {
    pub kind: TaskKind,
    /// Role a member must hold to take this step; `None` means anyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Role>,
}

impl TemplateStep {
    pub fn new(kind: TaskKind, requires: Option<Role>) -> Self {
        Self { kind, requires }
    }
}

/// Ordered sub-task template for one deliverable type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverableTemplate {
    /// Deliverable type, matched case-insensitively against request entries.
    pub deliverable: String,
    pub steps: Vec<TemplateStep>,
    /// Deliverables that must be finished before this one starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<String>,
}

/// Base effort of one task of a given kind at complexity 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseRate {
    pub hours: f64,
    pub tokens: u64,
}

impl BaseRate {
    pub fn new(hours: f64, tokens: u64) -> Self {
        Self { hours, tokens }
    }
}

/// Base rates keyed by task kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseRates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<BaseRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brief: Option<BaseRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<BaseRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<BaseRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produce: Option<BaseRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<BaseRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize: Option<BaseRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<BaseRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<BaseRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic: Option<BaseRate>,
}

impl BaseRates {
    pub fn get(&self, kind: TaskKind) -> Option<&BaseRate> {
        self.slot(kind).as_ref()
    }

    pub fn set(&mut self, kind: TaskKind, rate: Option<BaseRate>) {
        *self.slot_mut(kind) = rate;
    }

    fn slot(&self, kind: TaskKind) -> &Option<BaseRate> {
        match kind {
            TaskKind::Research => &self.research,
            TaskKind::Brief => &self.brief,
            TaskKind::Draft => &self.draft,
            TaskKind::Design => &self.design,
            TaskKind::Produce => &self.produce,
            TaskKind::Review => &self.review,
            TaskKind::Optimize => &self.optimize,
            TaskKind::Schedule => &self.schedule,
            TaskKind::Publish => &self.publish,
            TaskKind::Generic => &self.generic,
        }
    }

    fn slot_mut(&mut self, kind: TaskKind) -> &mut Option<BaseRate> {
        match kind {
            TaskKind::Research => &mut self.research,
            TaskKind::Brief => &mut self.brief,
            TaskKind::Draft => &mut self.draft,
            TaskKind::Design => &mut self.design,
            TaskKind::Produce => &mut self.produce,
            TaskKind::Review => &mut self.review,
            TaskKind::Optimize => &mut self.optimize,
            TaskKind::Schedule => &mut self.schedule,
            TaskKind::Publish => &mut self.publish,
            TaskKind::Generic => &mut self.generic,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (TaskKind, &BaseRate)> {
        ALL_KINDS
            .iter()
            .filter_map(move |&kind| self.get(kind).map(|rate| (kind, rate)))
    }
}

const ALL_KINDS: [TaskKind; 10] = [
    TaskKind::Research,
    TaskKind::Brief,
    TaskKind::Draft,
    TaskKind::Design,
    TaskKind::Produce,
    TaskKind::Review,
    TaskKind::Optimize,
    TaskKind::Schedule,
    TaskKind::Publish,
    TaskKind::Generic,
];

/// Hourly rate per role.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyRates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copywriter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designer: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_analyst: Option<f64>,
    /// Rates for custom roles, keyed by label (case-insensitive).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, f64>,
    /// Rate for custom roles without an entry in `custom`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_default: Option<f64>,
}

impl HourlyRates {
    pub fn for_role(&self, role: &Role) -> Option<f64> {
        match role {
            Role::Pm => self.pm,
            Role::Copywriter => self.copywriter,
            Role::Designer => self.designer,
            Role::SeoAnalyst => self.seo_analyst,
            Role::Custom(label) => {
                let wanted = label.to_lowercase();
                self.custom
                    .iter()
                    .find(|(key, _)| key.to_lowercase() == wanted)
                    .map(|(_, rate)| *rate)
                    .or(self.custom_default)
            }
        }
    }

    /// Configuration key reported when the rate for `role` is missing.
    pub fn key_for(role: &Role) -> String {
        match role {
            Role::Pm => "hourly_rates.pm".to_string(),
            Role::Copywriter => "hourly_rates.copywriter".to_string(),
            Role::Designer => "hourly_rates.designer".to_string(),
            Role::SeoAnalyst => "hourly_rates.seo_analyst".to_string(),
            Role::Custom(label) => format!("hourly_rates.custom.{}", label.to_lowercase()),
        }
    }

    fn iter(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        [
            ("pm", self.pm),
            ("copywriter", self.copywriter),
            ("designer", self.designer),
            ("seo_analyst", self.seo_analyst),
            ("custom_default", self.custom_default),
        ]
        .into_iter()
        .filter_map(|(key, rate)| rate.map(|r| (format!("hourly_rates.{}", key), r)))
        .chain(
            self.custom
                .iter()
                .map(|(label, rate)| (format!("hourly_rates.custom.{}", label), *rate)),
        )
    }
}

/// Complexity multiplier for each declared deliverable size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeMultipliers {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl Default for SizeMultipliers {
    fn default() -> Self {
        Self {
            small: 0.5,
            medium: 1.0,
            large: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub per_token_rate: f64,
    pub hours_per_day: f64,
    pub size_multipliers: SizeMultipliers,
    pub hourly_rates: HourlyRates,
    pub rates: BaseRates,
    pub roles: Vec<RoleRule>,
    pub templates: Vec<DeliverableTemplate>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        use TaskKind::*;

        let step = |kind, role: Role| TemplateStep::new(kind, Some(role));
        let template = |deliverable: &str, steps: Vec<TemplateStep>, after: &[&str]| DeliverableTemplate {
            deliverable: deliverable.to_string(),
            steps,
            after: after.iter().map(|s| s.to_string()).collect(),
        };

        let mut rates = BaseRates::default();
        for (kind, hours, tokens) in [
            (Research, 3.0, 4_000),
            (Brief, 1.5, 1_500),
            (Draft, 4.0, 6_000),
            (Design, 5.0, 2_000),
            (Produce, 8.0, 3_000),
            (Review, 1.5, 2_500),
            (Optimize, 2.0, 2_000),
            (Schedule, 1.0, 800),
            (Publish, 1.0, 500),
            (Generic, 4.0, 3_000),
        ] {
            rates.set(kind, Some(BaseRate::new(hours, tokens)));
        }

        Self {
            per_token_rate: DEFAULT_PER_TOKEN_RATE,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            size_multipliers: SizeMultipliers::default(),
            hourly_rates: HourlyRates {
                pm: Some(65.0),
                copywriter: Some(50.0),
                designer: Some(55.0),
                seo_analyst: Some(60.0),
                custom: BTreeMap::new(),
                custom_default: Some(45.0),
            },
            rates,
            roles: vec![
                RoleRule::new("pm", Role::Pm),
                RoleRule::new("project manager", Role::Pm),
                RoleRule::new("strategist", Role::Pm),
                RoleRule::new("copywriter", Role::Copywriter),
                RoleRule::new("writer", Role::Copywriter),
                RoleRule::new("editor", Role::Copywriter),
                RoleRule::new("designer", Role::Designer),
                RoleRule::new("seo", Role::SeoAnalyst),
                RoleRule::new("analyst", Role::SeoAnalyst),
            ],
            templates: vec![
                template(
                    "Blog posts",
                    vec![
                        step(Research, Role::SeoAnalyst),
                        step(Draft, Role::Copywriter),
                        step(Review, Role::Pm),
                        step(Publish, Role::SeoAnalyst),
                    ],
                    &[],
                ),
                template(
                    "Emailing",
                    vec![
                        step(Draft, Role::Copywriter),
                        step(Design, Role::Designer),
                        step(Review, Role::Pm),
                        step(Schedule, Role::Pm),
                    ],
                    &[],
                ),
                template(
                    "Social Ads",
                    vec![
                        step(Brief, Role::Pm),
                        step(Design, Role::Designer),
                        step(Draft, Role::Copywriter),
                        step(Review, Role::Pm),
                    ],
                    &[],
                ),
                template(
                    "Landing page",
                    vec![
                        step(Draft, Role::Copywriter),
                        step(Design, Role::Designer),
                        step(Optimize, Role::SeoAnalyst),
                        step(Publish, Role::Pm),
                    ],
                    &[],
                ),
                template(
                    "Video",
                    vec![
                        step(Brief, Role::Pm),
                        step(Draft, Role::Copywriter),
                        step(Produce, Role::Designer),
                        step(Review, Role::Pm),
                    ],
                    &[],
                ),
                template(
                    "Webinar",
                    vec![
                        step(Brief, Role::Pm),
                        TemplateStep::new(Produce, None),
                        step(Schedule, Role::Pm),
                    ],
                    &["Landing page"],
                ),
            ],
        }
    }
}

impl PlannerConfig {
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".crewplan"))
    }

    /// Default location of the configuration file: `~/.crewplan/crewplan.toml`.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("crewplan.toml"))
    }

    /// Parse and validate a TOML document. Tables it omits keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading planner config");
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    /// Load the default configuration file, falling back to built-in defaults when absent.
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            debug!("config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Template for a deliverable name (trimmed, case-insensitive), if any.
    pub fn template_for(&self, deliverable: &str) -> Option<&DeliverableTemplate> {
        let wanted = deliverable.trim().to_lowercase();
        self.templates
            .iter()
            .find(|t| t.deliverable.trim().to_lowercase() == wanted)
    }

    /// Check the tables for internal consistency.
    ///
    /// # Errors
    /// - `RoleAssignment` if the role table has empty or duplicate labels
    /// - `Configuration` naming the offending key for anything else
    pub fn validate(&self) -> Result<()> {
        check_rules(&self.roles)?;
        self.validate_templates()?;

        non_negative("per_token_rate", self.per_token_rate)?;
        positive("hours_per_day", self.hours_per_day)?;
        positive("size_multipliers.small", self.size_multipliers.small)?;
        positive("size_multipliers.medium", self.size_multipliers.medium)?;
        positive("size_multipliers.large", self.size_multipliers.large)?;
        for (key, rate) in self.hourly_rates.iter() {
            non_negative(&key, rate)?;
        }
        let mut labels = HashSet::new();
        for label in self.hourly_rates.custom.keys() {
            if !labels.insert(label.to_lowercase()) {
                return Err(Error::configuration(format!(
                    "hourly_rates.custom.{} (duplicate label)",
                    label.to_lowercase()
                )));
            }
        }
        for (kind, rate) in self.rates.iter() {
            positive(&format!("rates.{}.hours", kind), rate.hours)?;
        }
        Ok(())
    }

    fn validate_templates(&self) -> Result<()> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (i, template) in self.templates.iter().enumerate() {
            let name = template.deliverable.trim().to_lowercase();
            if name.is_empty() {
                return Err(Error::configuration(format!("templates[{}].deliverable", i)));
            }
            if seen.insert(name, i).is_some() {
                return Err(Error::configuration(format!(
                    "templates[{}].deliverable (duplicate {:?})",
                    i, template.deliverable
                )));
            }
            if template.steps.is_empty() {
                return Err(Error::configuration(format!("templates[{}].steps", i)));
            }
        }

        // Cross-deliverable ordering must itself be acyclic, so the task graph
        // built from it stays acyclic.
        let mut graph = DiGraph::<String, ()>::new();
        let mut nodes = HashMap::new();
        let mut node = |graph: &mut DiGraph<String, ()>, name: &str| {
            let key = name.trim().to_lowercase();
            *nodes
                .entry(key.clone())
                .or_insert_with(|| graph.add_node(key))
        };
        for template in &self.templates {
            let to = node(&mut graph, &template.deliverable);
            for before in &template.after {
                let from = node(&mut graph, before);
                graph.add_edge(from, to, ());
            }
        }
        if is_cyclic_directed(&graph) {
            return Err(Error::configuration("templates.after (dependency cycle)"));
        }
        Ok(())
    }
}

fn non_negative(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::configuration(key))
    }
}

fn positive(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::configuration(key))
    }
}
