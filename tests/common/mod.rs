//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use serde_json::{json, Value};

use containerapp::app::manifest::{
    Configuration, Container, ContainerAppSpec, ContainerResources, EnvironmentVar, HttpScaleRule,
    Ingress, IpSecurityRestriction, ManagedIdentity, PortMapping, Properties, Scale, ScaleRule,
    ScaleRuleAuth, Template, TrafficWeight,
};
use containerapp::app::{Expectation, ManifestDocument, ResourceApi, ResourceTarget};
use containerapp::errors::{ServiceError, ServiceResult};

pub const SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";
pub const GROUP: &str = "clitest-rg";
pub const USER_IDENTITY: &str = "/subscriptions/00000000-0000-0000-0000-000000000000\
    /resourceGroups/clitest-rg/providers/Microsoft.ManagedIdentity\
    /userAssignedIdentities/containerapp-user";

pub fn target(name: &str) -> ResourceTarget {
    ResourceTarget::new(SUBSCRIPTION, GROUP, name).unwrap()
}

pub fn environment_id(name: &str) -> String {
    target("placeholder").environment_id(name)
}

/// In-memory management API
///
/// Stores every submitted document keyed by resource id. Create responses
/// report `InProgress`; `show` reports `Succeeded`, as the service does once
/// provisioning completes.
#[derive(Default)]
pub struct InMemoryContainerApps {
    resources: Mutex<HashMap<String, Value>>,
    submissions: Mutex<Vec<Value>>,
}

impl InMemoryContainerApps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents received by `create_or_update`, in order
    pub fn submissions(&self) -> Vec<Value> {
        self.submissions.lock().unwrap().clone()
    }
}

impl ResourceApi for InMemoryContainerApps {
    async fn create_or_update(
        &self,
        target: &ResourceTarget,
        document: &ManifestDocument,
    ) -> ServiceResult<Value> {
        let body = document.as_value().clone();
        self.submissions.lock().unwrap().push(body.clone());

        let mut resource = body;
        resource["id"] = json!(target.resource_id());
        resource["name"] = json!(target.name());
        resource["properties"]["provisioningState"] = json!("InProgress");

        self.resources
            .lock()
            .unwrap()
            .insert(target.resource_id(), resource.clone());
        Ok(resource)
    }

    async fn show(&self, target: &ResourceTarget) -> ServiceResult<Value> {
        let mut resources = self.resources.lock().unwrap();
        let resource = resources
            .get_mut(&target.resource_id())
            .ok_or_else(|| ServiceError::NotFound {
                resource_id: target.resource_id(),
            })?;
        resource["properties"]["provisioningState"] = json!("Succeeded");
        Ok(resource.clone())
    }
}

/// The manifest from the create-with-yaml scenario
pub fn scenario_spec(environment_id: Option<String>) -> ContainerAppSpec {
    let mut spec = ContainerAppSpec::new("eastus");
    spec.tags.insert("tagname".to_string(), "value".to_string());
    spec.properties = Properties {
        environment_id,
        configuration: Some(Configuration {
            active_revisions_mode: Some("Multiple".to_string()),
            ingress: Some(Ingress {
                external: Some(false),
                additional_port_mappings: vec![
                    PortMapping::internal(12345),
                    PortMapping::internal(9090).exposed_as(23456),
                ],
                allow_insecure: Some(false),
                target_port: Some(80),
                traffic: vec![TrafficWeight {
                    latest_revision: Some(true),
                    revision_name: None,
                    weight: 100,
                }],
                transport: Some("Auto".to_string()),
                ip_security_restrictions: vec![IpSecurityRestriction {
                    name: "name".to_string(),
                    ip_address_range: "1.1.1.1/10".to_string(),
                    action: "Allow".to_string(),
                    description: None,
                }],
            }),
        }),
        template: Some(Template {
            revision_suffix: Some("myrevision".to_string()),
            termination_grace_period_seconds: Some(90),
            containers: vec![Container {
                image: "nginx".to_string(),
                name: "nginx".to_string(),
                env: vec![EnvironmentVar::plain("HTTP_PORT", 80)],
                command: vec!["npm".to_string(), "start".to_string()],
                args: Vec::new(),
                resources: Some(ContainerResources {
                    cpu: 0.5,
                    memory: "1Gi".to_string(),
                }),
            }],
            scale: Some(Scale {
                min_replicas: Some(1),
                max_replicas: Some(3),
                rules: vec![ScaleRule {
                    http: Some(HttpScaleRule {
                        auth: vec![ScaleRuleAuth {
                            secret_ref: "secretref".to_string(),
                            trigger_parameter: "trigger".to_string(),
                        }],
                        metadata: BTreeMap::from([
                            ("concurrentRequests".to_string(), "50".to_string()),
                            ("key".to_string(), "value".to_string()),
                        ]),
                    }),
                    name: "http-scale-rule".to_string(),
                }],
            }),
        }),
    };
    spec.identity = Some(ManagedIdentity::user_assigned([USER_IDENTITY]));
    spec
}

/// Field checks the created resource must pass
pub fn scenario_checks(environment_id: &str) -> Vec<Expectation> {
    let ingress = "properties.configuration.ingress";
    let rule = "properties.template.scale.rules[0]";

    vec![
        check("properties.provisioningState", json!("Succeeded")),
        check("properties.environmentId", json!(environment_id)),
        check(&format!("{ingress}.external"), json!(false)),
        check(&format!("{ingress}.additionalPortMappings[0].external"), json!(false)),
        check(&format!("{ingress}.additionalPortMappings[0].targetPort"), json!(12345)),
        check(&format!("{ingress}.additionalPortMappings[1].external"), json!(false)),
        check(&format!("{ingress}.additionalPortMappings[1].targetPort"), json!(9090)),
        check(&format!("{ingress}.additionalPortMappings[1].exposedPort"), json!(23456)),
        check(&format!("{ingress}.ipSecurityRestrictions[0].name"), json!("name")),
        check(&format!("{ingress}.ipSecurityRestrictions[0].ipAddressRange"), json!("1.1.1.1/10")),
        check(&format!("{ingress}.ipSecurityRestrictions[0].action"), json!("Allow")),
        check("properties.template.revisionSuffix", json!("myrevision")),
        check("properties.template.terminationGracePeriodSeconds", json!(90)),
        check("properties.template.containers[0].name", json!("nginx")),
        check("properties.template.scale.minReplicas", json!(1)),
        check("properties.template.scale.maxReplicas", json!(3)),
        check(&format!("{rule}.name"), json!("http-scale-rule")),
        check(&format!("{rule}.http.metadata.concurrentRequests"), json!("50")),
        check(&format!("{rule}.http.metadata.key"), json!("value")),
        check(&format!("{rule}.http.auth[0].triggerParameter"), json!("trigger")),
        check(&format!("{rule}.http.auth[0].secretRef"), json!("secretref")),
    ]
}

fn check(path: &str, expected: Value) -> Expectation {
    Expectation::new(path, expected).unwrap()
}
