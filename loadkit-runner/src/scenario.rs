/// One ramp step in the generated `options.stages` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub duration_secs: u64,
    pub target_vus: u32,
}

/// One target route, reported under `name` in the summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: String,
    pub path: String,
}

impl Route {
    /// Parse `NAME=/path` as given on the command line.
    /// The path must be absolute so joining it onto the base URL is unambiguous.
    pub fn parse(spec: &str) -> Option<Route> {
        let (name, path) = spec.split_once('=')?;
        let name = name.trim();
        let path = path.trim();
        if name.is_empty() || !path.starts_with('/') {
            return None;
        }
        Some(Route {
            name: name.to_string(),
            path: path.to_string(),
        })
    }
}

/// Scenario profiles controlling the VU ramp handed to k6.
///
/// | Profile | Ramp                                            |
/// |---------|-------------------------------------------------|
/// | Smoke   | 1 VU for the whole run                          |
/// | Load    | ramp to N, hold, ramp down                      |
/// | Stress  | ramp to N, hold, ramp to 2N, hold, ramp down    |
/// | Spike   | burst to 4N, immediate ramp down                |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioProfile {
    Smoke,
    Load,
    Stress,
    Spike,
}

impl ScenarioProfile {
    pub fn from_name(name: &str) -> Option<ScenarioProfile> {
        match name {
            "smoke" => Some(ScenarioProfile::Smoke),
            "load" => Some(ScenarioProfile::Load),
            "stress" => Some(ScenarioProfile::Stress),
            "spike" => Some(ScenarioProfile::Spike),
            _ => None,
        }
    }

    pub fn as_name(&self) -> &'static str {
        match self {
            ScenarioProfile::Smoke => "smoke",
            ScenarioProfile::Load => "load",
            ScenarioProfile::Stress => "stress",
            ScenarioProfile::Spike => "spike",
        }
    }

    /// VU ramp for this profile, scaled to `vus` and `duration_secs`.
    /// Stage durations always sum to at most `duration_secs` and every
    /// stage lasts at least one second.
    pub fn stages(&self, vus: u32, duration_secs: u64) -> Vec<Stage> {
        let ramp = (duration_secs / 10).max(1);
        match self {
            ScenarioProfile::Smoke => vec![Stage {
                duration_secs: duration_secs.max(1),
                target_vus: 1,
            }],
            ScenarioProfile::Load => {
                let hold = duration_secs.saturating_sub(2 * ramp).max(1);
                vec![
                    Stage { duration_secs: ramp, target_vus: vus },
                    Stage { duration_secs: hold, target_vus: vus },
                    Stage { duration_secs: ramp, target_vus: 0 },
                ]
            }
            ScenarioProfile::Stress => {
                let hold = (duration_secs.saturating_sub(3 * ramp) / 2).max(1);
                vec![
                    Stage { duration_secs: ramp, target_vus: vus },
                    Stage { duration_secs: hold, target_vus: vus },
                    Stage { duration_secs: ramp, target_vus: vus * 2 },
                    Stage { duration_secs: hold, target_vus: vus * 2 },
                    Stage { duration_secs: ramp, target_vus: 0 },
                ]
            }
            ScenarioProfile::Spike => vec![
                Stage { duration_secs: ramp, target_vus: vus * 4 },
                Stage { duration_secs: ramp, target_vus: 0 },
            ],
        }
    }

    /// Render the k6 scenario script for this profile.
    ///
    /// Each route is requested with an `endpoint` tag and a
    /// `"<name> - status is 200"` check, matching what the report pipeline
    /// resolves endpoints from.
    pub fn render_script(
        &self,
        base_url: &str,
        routes: &[Route],
        vus: u32,
        duration_secs: u64,
    ) -> String {
        let base = base_url.trim_end_matches('/');

        let mut script = String::new();
        script.push_str("import http from 'k6/http';\n");
        script.push_str("import { check, sleep } from 'k6';\n\n");

        script.push_str("export const options = {\n    stages: [\n");
        for stage in self.stages(vus, duration_secs) {
            script.push_str(&format!(
                "        {{ duration: '{}s', target: {} }},\n",
                stage.duration_secs, stage.target_vus
            ));
        }
        script.push_str("    ],\n};\n\n");

        script.push_str("export default function () {\n");
        for route in routes {
            // JSON string encoding doubles as JS string escaping here
            let url = json_string(&format!("{}{}", base, route.path));
            let name = json_string(&route.name);
            let label = json_string(&format!("{} - status is 200", route.name));
            script.push_str(&format!(
                "    {{\n        const res = http.get({url}, {{ tags: {{ endpoint: {name} }} }});\n        check(res, {{ {label}: (r) => r.status === 200 }}, {{ endpoint: {name} }});\n    }}\n"
            ));
        }
        script.push_str("    sleep(1);\n}\n");
        script
    }
}

fn json_string(s: &str) -> String {
    // only strings go through here, so serialization cannot fail
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
