// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use rigger_provision::{ResourceSpec, Stage};

/// Render the ordered calls a run would make.
pub fn render_plan(plan: &[(Stage, Vec<ResourceSpec>)]) -> String {
	let mut out = String::new();
	for (stage, specs) in plan {
		out.push_str(&format!("[{stage}] {}\n", stage.title()));
		for spec in specs {
			let critical = if spec.critical { "" } else { " (best effort)" };
			out.push_str(&format!("  {} '{}'{critical}\n", spec.kind, spec.label));
			for call in spec.describe_calls() {
				out.push_str(&format!("    {call}\n"));
			}
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use rigger_provision::{ProvisionConfig, Provisioner};
	use rigger_teamcity::TeamCityClient;

	use super::*;

	#[test]
	fn plan_lists_every_stage_in_order() {
		let config = ProvisionConfig::builder()
			.server_url("http://ci.local:8111")
			.username("admin")
			.password("pw")
			.project_id("MineRL")
			.project_name("MineRL Agent System")
			.build_type_id("AgentSensorPlugin")
			.git_url("https://github.com/example/mineai.git")
			.build()
			.unwrap();
		let client = TeamCityClient::new(config.server()).unwrap();
		let text = render_plan(&Provisioner::new(client, config).plan());

		let positions: Vec<usize> = Stage::ALL
			.iter()
			.map(|stage| text.find(&format!("[{stage}]")).unwrap())
			.collect();
		assert!(positions.windows(2).all(|w| w[0] < w[1]));
		assert!(text.contains("GET  /app/rest/projects/id:MineRL"));
		assert!(text.contains(
			"PUT  /app/rest/buildTypes/id:AgentSensorPlugin/settings/artifactRules (text/plain)"
		));
		assert!(text.contains("(best effort)"));
	}
}
