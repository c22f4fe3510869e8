//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use abq_sdk::AbiquoContext;
use abq_sdk::api::mock::MockTransport;
use abq_sdk::api::{Credentials, RestLink};

pub const API: &str = "http://abiquo.test/api";
pub const VDC: &str = "http://abiquo.test/api/cloud/virtualdatacenters/1";
pub const VAPP: &str = "http://abiquo.test/api/cloud/virtualdatacenters/1/virtualappliances/2";
pub const VM: &str =
    "http://abiquo.test/api/cloud/virtualdatacenters/1/virtualappliances/2/virtualmachines/3";

pub fn context(mock: &MockTransport) -> AbiquoContext {
    context_with_delay(mock, Duration::from_secs(5))
}

pub fn context_with_delay(mock: &MockTransport, delay: Duration) -> AbiquoContext {
    AbiquoContext::builder(API, Credentials::basic("admin", "xabiquo"))
        .async_task_monitor_delay(delay)
        .transport(Arc::new(mock.clone()))
        .build()
        .unwrap()
}

pub fn link(rel: &str, href: impl Into<String>) -> RestLink {
    RestLink::new(rel, href)
}

/// `<task>` document with a `self` link under the VM.
pub fn task_xml(id: &str, state: &str, timestamp: i64, jobs: &str) -> String {
    format!(
        "<task><link rel=\"self\" href=\"{VM}/tasks/{id}\"/><taskId>{id}</taskId>\
         <type>DEPLOY</type><ownerId>3</ownerId><state>{state}</state>\
         <timestamp>{timestamp}</timestamp><jobs>{jobs}</jobs></task>"
    )
}

pub fn failed_job_xml(description: &str) -> String {
    format!(
        "<job><id>j1</id><parentTaskId>T1</parentTaskId><type>POWER_ON</type>\
         <description>{description}</description><state>FAILED</state>\
         <rollbackState>DONE</rollbackState><timestamp>0</timestamp></job>"
    )
}

pub fn accepted_xml(task_id: &str) -> String {
    format!(
        "<acceptedrequest><link rel=\"status\" href=\"{VM}/tasks/{task_id}\"/>\
         <message>You can keep track of the progress in the link</message></acceptedrequest>"
    )
}
