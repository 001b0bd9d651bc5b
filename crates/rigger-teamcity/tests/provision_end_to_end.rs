// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Full provisioning runs over HTTP against a mocked TeamCity.

use rigger_provision::{ProvisionConfig, ProvisionError, Provisioner, ResourceKind, StepStatus};
use rigger_teamcity::TeamCityClient;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(uri: &str) -> ProvisionConfig {
	ProvisionConfig::builder()
		.server_url(uri)
		.username("builder")
		.password("builder-pass")
		.project_id("MineRL")
		.project_name("MineRL Agent System")
		.build_type_id("AgentSensorPlugin")
		.vcs_root_name("MineRL Repository")
		.git_url("https://github.com/example/mineai.git")
		.build()
		.unwrap()
}

fn provisioner(uri: &str) -> Provisioner<TeamCityClient> {
	let config = config(uri);
	let client = TeamCityClient::new(config.server()).unwrap();
	Provisioner::new(client, config)
}

async fn mount_not_found(server: &MockServer, p: &str) {
	Mock::given(method("GET"))
		.and(path(p))
		.respond_with(ResponseTemplate::new(404))
		.expect(1)
		.mount(server)
		.await;
}

#[tokio::test]
async fn empty_server_is_fully_provisioned() {
	let server = MockServer::start().await;

	mount_not_found(&server, "/app/rest/projects/id:MineRL").await;
	mount_not_found(&server, "/app/rest/vcs-roots/id:MineRL_GitRoot").await;
	mount_not_found(&server, "/app/rest/buildTypes/id:AgentSensorPlugin").await;

	Mock::given(method("POST"))
		.and(path("/app/rest/projects"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "MineRL"})))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/app/rest/vcs-roots"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "MineRL_GitRoot"})))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/app/rest/projects/id:MineRL/buildTypes"))
		.respond_with(
			ResponseTemplate::new(200).set_body_json(json!({"id": "AgentSensorPlugin"})),
		)
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path(
			"/app/rest/buildTypes/id:AgentSensorPlugin/vcs-root-entries",
		))
		.and(body_json(
			json!({"vcs-root": {"id": "MineRL_GitRoot"}, "checkout-rules": ""}),
		))
		.respond_with(ResponseTemplate::new(200))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/app/rest/buildTypes/id:AgentSensorPlugin/steps"))
		.respond_with(ResponseTemplate::new(200))
		.expect(3)
		.mount(&server)
		.await;
	Mock::given(method("PUT"))
		.and(path(
			"/app/rest/buildTypes/id:AgentSensorPlugin/settings/artifactRules",
		))
		.respond_with(ResponseTemplate::new(200))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path("/app/rest/buildTypes/id:AgentSensorPlugin/triggers"))
		.respond_with(ResponseTemplate::new(200))
		.expect(2)
		.mount(&server)
		.await;

	let report = provisioner(&server.uri()).run().await.unwrap();

	assert_eq!(report.count(StepStatus::Created), 8);
	assert_eq!(report.count(StepStatus::Updated), 1);
	assert_eq!(report.count(StepStatus::Failed), 0);
	server.verify().await;
}

#[tokio::test]
async fn existing_configuration_is_left_alone() {
	let server = MockServer::start().await;

	for (p, id) in [
		("/app/rest/projects/id:MineRL", "MineRL"),
		("/app/rest/vcs-roots/id:MineRL_GitRoot", "MineRL_GitRoot"),
		("/app/rest/buildTypes/id:AgentSensorPlugin", "AgentSensorPlugin"),
	] {
		Mock::given(method("GET"))
			.and(path(p))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": id })))
			.mount(&server)
			.await;
	}
	Mock::given(method("POST"))
		.and(path("/app/rest/projects"))
		.respond_with(ResponseTemplate::new(200))
		.expect(0)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path(
			"/app/rest/buildTypes/id:AgentSensorPlugin/vcs-root-entries",
		))
		.respond_with(ResponseTemplate::new(200))
		.expect(0)
		.mount(&server)
		.await;
	// Unmatched requests (steps, triggers) get wiremock's default 404 and
	// are recorded as best-effort failures.
	Mock::given(method("PUT"))
		.respond_with(ResponseTemplate::new(200))
		.mount(&server)
		.await;

	let report = provisioner(&server.uri()).run().await.unwrap();

	assert_eq!(report.status_of(ResourceKind::Project), Some(StepStatus::Existed));
	assert_eq!(report.status_of(ResourceKind::VcsRoot), Some(StepStatus::Existed));
	assert_eq!(report.status_of(ResourceKind::BuildType), Some(StepStatus::Existed));
	assert_eq!(report.count(StepStatus::Failed), 5);
	server.verify().await;
}

#[tokio::test]
async fn forbidden_project_creation_aborts_run() {
	let server = MockServer::start().await;

	mount_not_found(&server, "/app/rest/projects/id:MineRL").await;
	Mock::given(method("POST"))
		.and(path("/app/rest/projects"))
		.respond_with(ResponseTemplate::new(403))
		.expect(1)
		.mount(&server)
		.await;

	let err = provisioner(&server.uri()).run().await.unwrap_err();

	let ProvisionError::FatalStep { kind, .. } = &err;
	assert_eq!(*kind, ResourceKind::Project);
	let received = server.received_requests().await.unwrap();
	assert_eq!(received.len(), 2);
}
