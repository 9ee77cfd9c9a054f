//! Robots exclusion file parsing and critical-agent access resolution.
//!
//! The parser keeps rules as an ordered `(user-agent, directive, path)` list
//! so resolution can honor "first matching rule wins" semantics. Malformed
//! lines are skipped, never fatal.
//!
//! Access for a given agent resolves in two tiers: rules under that agent's
//! own block first, then rules under the wildcard (`*`) block. Within a
//! tier, the first `Allow: /` or `Disallow: /` decides. An agent with no
//! matching rule in either tier is **allowed** by default.

/// A directive inside a robots file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `Allow:` line.
    Allow,
    /// `Disallow:` line.
    Disallow,
}

/// One parsed rule, attributed to a single user-agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsRule {
    /// Lowercased user-agent the rule applies to (`*` for wildcard).
    pub agent: String,
    /// Allow or Disallow.
    pub directive: Directive,
    /// Path the directive applies to, as written.
    pub path: String,
}

/// An ordered set of robots rules.
#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    rules: Vec<RobotsRule>,
}

/// One of the fixed AI crawler identifiers whose access drives the
/// access-control score.
#[derive(Debug, Clone, Copy)]
pub struct CriticalAgent {
    /// User-agent token as it appears in robots files.
    pub id: &'static str,
    /// Product/platform the agent belongs to, for display.
    pub platform: &'static str,
    /// Relative importance of this agent's access.
    pub weight: u32,
}

/// The critical AI agents and their weights (weights sum to 100).
pub const CRITICAL_AGENTS: &[CriticalAgent] = &[
    CriticalAgent {
        id: "GPTBot",
        platform: "OpenAI",
        weight: 25,
    },
    CriticalAgent {
        id: "ClaudeBot",
        platform: "Anthropic",
        weight: 20,
    },
    CriticalAgent {
        id: "ChatGPT-User",
        platform: "OpenAI",
        weight: 15,
    },
    CriticalAgent {
        id: "PerplexityBot",
        platform: "Perplexity",
        weight: 15,
    },
    CriticalAgent {
        id: "Claude-Web",
        platform: "Anthropic",
        weight: 10,
    },
    CriticalAgent {
        id: "Google-Extended",
        platform: "Google",
        weight: 10,
    },
    CriticalAgent {
        id: "CCBot",
        platform: "Common Crawl",
        weight: 5,
    },
];

/// Resolved access for one critical agent.
#[derive(Debug, Clone)]
pub struct AgentAccess {
    /// The agent that was resolved.
    pub agent: CriticalAgent,
    /// Whether the rules allow the agent to crawl the site root.
    pub allowed: bool,
}

impl RobotsRules {
    /// Parse robots.txt content into an ordered rule list.
    ///
    /// Lines that are not `key: value` pairs, and directives outside any
    /// user-agent block, are skipped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut rules = Vec::new();
        let mut current_agents: Vec<String> = Vec::new();
        let mut in_directives = false;

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // A user-agent line after directives starts a new block.
                    if in_directives {
                        current_agents.clear();
                        in_directives = false;
                    }
                    current_agents.push(value.to_lowercase());
                },
                "allow" | "disallow" => {
                    in_directives = true;
                    let directive = if key == "allow" {
                        Directive::Allow
                    } else {
                        Directive::Disallow
                    };
                    for agent in &current_agents {
                        rules.push(RobotsRule {
                            agent: agent.clone(),
                            directive,
                            path: value.to_string(),
                        });
                    }
                },
                _ => {},
            }
        }

        Self { rules }
    }

    /// The parsed rules in file order.
    #[must_use]
    pub fn rules(&self) -> &[RobotsRule] {
        &self.rules
    }

    /// Resolve root access for one agent identifier.
    ///
    /// Agent-specific rules are consulted before wildcard rules; within each
    /// tier the first `Allow: /` or `Disallow: /` wins. No match means
    /// allowed.
    #[must_use]
    pub fn is_agent_allowed(&self, agent_id: &str) -> bool {
        let agent_lower = agent_id.to_lowercase();

        for tier_agent in [agent_lower.as_str(), "*"] {
            let decided = self
                .rules
                .iter()
                .filter(|rule| rule.agent == tier_agent && rule.path == "/")
                .map(|rule| rule.directive == Directive::Allow)
                .next();
            if let Some(allowed) = decided {
                return allowed;
            }
        }

        true
    }

    /// Resolve access for every critical agent.
    #[must_use]
    pub fn evaluate_critical_agents(&self) -> Vec<AgentAccess> {
        CRITICAL_AGENTS
            .iter()
            .map(|agent| AgentAccess {
                agent: *agent,
                allowed: self.is_agent_allowed(agent.id),
            })
            .collect()
    }
}

/// Sum of all critical-agent weights.
#[must_use]
pub fn total_agent_weight() -> u32 {
    CRITICAL_AGENTS.iter().map(|a| a.weight).sum()
}
