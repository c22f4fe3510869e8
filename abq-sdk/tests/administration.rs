mod common;

use abq_sdk::admin::{Enterprise, ResourceLimits};
use abq_sdk::api::mock::MockTransport;
use abq_sdk::api::types::{DatacenterDto, EnterpriseDto, VirtualDatacenterDto, VirtualMachineDto};
use abq_sdk::api::{EnterpriseOptions, IpOptions, Method, StatusCode};
use abq_sdk::cloud::{VirtualDatacenter, VirtualMachine};
use abq_sdk::infrastructure::Datacenter;
use abq_sdk::{AbiquoContext, ErrorKind, predicates};

use common::*;

const ENTERPRISE: &str = "http://abiquo.test/api/admin/enterprises/1";
const DATACENTER: &str = "http://abiquo.test/api/admin/datacenters/4";

fn enterprise_xml(name: &str) -> String {
    format!(
        "<enterprise><link rel=\"edit\" href=\"{ENTERPRISE}\"/>\
         <link rel=\"limits\" href=\"{ENTERPRISE}/limits\"/>\
         <link rel=\"cloud/virtualdatacenters\" href=\"{ENTERPRISE}/action/virtualdatacenters\"/>\
         <id>1</id><name>{name}</name><cpuSoft>4</cpuSoft><cpuHard>8</cpuHard></enterprise>"
    )
}

fn persisted_enterprise(ctx: &AbiquoContext) -> Enterprise {
    let mut dto = EnterpriseDto {
        id: Some(1),
        name: Some("Abiquo".into()),
        ..Default::default()
    };
    dto.links.push(link("edit", ENTERPRISE));
    dto.links.push(link("limits", format!("{ENTERPRISE}/limits")));
    dto.links.push(link(
        "cloud/virtualdatacenters",
        format!("{ENTERPRISE}/action/virtualdatacenters"),
    ));
    Enterprise::wrap(ctx, dto)
}

fn datacenter(ctx: &AbiquoContext) -> Datacenter {
    let mut dto = DatacenterDto {
        id: Some(4),
        ..Default::default()
    };
    dto.links.push(link("edit", DATACENTER));
    Datacenter::wrap(ctx, dto)
}

// ==================== Enterprises ====================

#[tokio::test]
async fn test_enterprise_save_sends_limits() {
    let mock = MockTransport::new();
    let url = format!("{API}/admin/enterprises");
    mock.on(Method::POST, &url, StatusCode::CREATED, &enterprise_xml("Abiquo"));
    let ctx = context(&mock);

    let mut enterprise = Enterprise::builder(&ctx, "Abiquo")
        .limits(ResourceLimits::default().cpu(4, 8))
        .reservation_restricted(true)
        .build();
    assert!(!enterprise.is_persisted());
    enterprise.save().await.unwrap();

    assert!(enterprise.is_persisted());
    assert_eq!(enterprise.id().unwrap(), Some(1));
    assert_eq!(enterprise.limits().unwrap().cpu_hard, 8);
    let sent = mock.requests_to(&Method::POST, &url);
    let body = sent[0].body.as_deref().unwrap();
    assert!(body.contains("<name>Abiquo</name>"));
    assert!(body.contains("<cpuSoft>4</cpuSoft><cpuHard>8</cpuHard>"));
    assert!(body.contains("<isReservationRestricted>true</isReservationRestricted>"));
}

#[tokio::test]
async fn test_enterprise_with_inverted_limits_is_not_sent() {
    let mock = MockTransport::new();
    let ctx = context(&mock);

    let mut enterprise = Enterprise::builder(&ctx, "Abiquo")
        .limits(ResourceLimits::default().ram_mb(4096, 2048))
        .build();
    let err = enterprise.save().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_enterprise_update_and_delete_use_edit_link() {
    let mock = MockTransport::new();
    mock.on(Method::PUT, ENTERPRISE, StatusCode::OK, &enterprise_xml("Renamed"));
    mock.on(Method::DELETE, ENTERPRISE, StatusCode::NO_CONTENT, "");
    let ctx = context(&mock);
    let mut enterprise = persisted_enterprise(&ctx);

    enterprise.set_name("Renamed").unwrap();
    enterprise.update().await.unwrap();
    assert_eq!(enterprise.name().unwrap(), Some("Renamed"));

    enterprise.delete().await.unwrap();
    assert!(enterprise.is_deleted());
    assert_eq!(mock.requests().len(), 2);
}

#[tokio::test]
async fn test_find_enterprise_by_name() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        &format!("{API}/admin/enterprises"),
        StatusCode::OK,
        &format!("<enterprises>{}</enterprises>", enterprise_xml("Abiquo")),
    );
    let ctx = context(&mock);

    let found = ctx
        .administration()
        .find_enterprise(predicates::enterprise::name(["Abiquo"]))
        .await
        .unwrap();
    assert_eq!(found.unwrap().id().unwrap(), Some(1));

    let missing = ctx
        .administration()
        .find_enterprise(predicates::enterprise::name(["Other"]))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_missing_enterprise_is_none() {
    let mock = MockTransport::new();
    let ctx = context(&mock);

    let found = ctx.administration().get_enterprise(99).await.unwrap();
    assert!(found.is_none());
    assert_eq!(
        mock.requests()[0].url.as_str(),
        format!("{API}/admin/enterprises/99")
    );
}

#[tokio::test]
async fn test_enterprise_lists_its_virtual_datacenters() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        &format!("{ENTERPRISE}/action/virtualdatacenters"),
        StatusCode::OK,
        &format!(
            "<virtualDatacenters><virtualDatacenter><link rel=\"edit\" href=\"{VDC}\"/>\
             <id>1</id><name>vdc</name></virtualDatacenter></virtualDatacenters>"
        ),
    );
    let ctx = context(&mock);

    let vdcs = persisted_enterprise(&ctx)
        .list_virtual_datacenters()
        .await
        .unwrap();
    assert_eq!(vdcs.len(), 1);
    assert_eq!(vdcs[0].name().unwrap(), Some("vdc"));
}

// ==================== Datacenter limits ====================

#[tokio::test]
async fn test_allow_datacenter_creates_limits() {
    let mock = MockTransport::new();
    let url = format!("{ENTERPRISE}/limits?datacenter=4");
    mock.on(
        Method::POST,
        &url,
        StatusCode::CREATED,
        &format!(
            "<limit><link rel=\"edit\" href=\"{ENTERPRISE}/limits/9\"/>\
             <link rel=\"datacenter\" href=\"{DATACENTER}\"/><id>9</id>\
             <vlansSoft>2</vlansSoft><vlansHard>4</vlansHard></limit>"
        ),
    );
    let ctx = context(&mock);

    let limits = persisted_enterprise(&ctx)
        .allow_datacenter_within(&datacenter(&ctx), ResourceLimits::default().vlans(2, 4))
        .await
        .unwrap();

    assert_eq!(limits.id().unwrap(), Some(9));
    assert_eq!(limits.limits().unwrap().vlans_hard, 4);
    let sent = mock.requests_to(&Method::POST, &url);
    assert!(sent[0].body.as_deref().unwrap().contains("<vlansSoft>2</vlansSoft>"));
}

#[tokio::test]
async fn test_allow_unsaved_datacenter_fails_locally() {
    let mock = MockTransport::new();
    let ctx = context(&mock);
    let unsaved = Datacenter::builder(&ctx).name("dc").build();

    let err = persisted_enterprise(&ctx)
        .allow_datacenter(&unsaved)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_prohibit_datacenter_deletes_its_limits() {
    let mock = MockTransport::new();
    let limit = format!("{ENTERPRISE}/limits/9");
    mock.on(
        Method::GET,
        &format!("{ENTERPRISE}/limits?datacenter=4"),
        StatusCode::OK,
        &format!("<limits><limit><link rel=\"edit\" href=\"{limit}\"/><id>9</id></limit></limits>"),
    );
    mock.on(Method::DELETE, &limit, StatusCode::NO_CONTENT, "");
    let ctx = context(&mock);

    persisted_enterprise(&ctx)
        .prohibit_datacenter(&datacenter(&ctx))
        .await
        .unwrap();
    assert_eq!(mock.requests_to(&Method::DELETE, &limit).len(), 1);
}

#[tokio::test]
async fn test_prohibit_datacenter_not_allowed_is_noop() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        &format!("{ENTERPRISE}/limits?datacenter=4"),
        StatusCode::OK,
        "<limits/>",
    );
    let ctx = context(&mock);

    persisted_enterprise(&ctx)
        .prohibit_datacenter(&datacenter(&ctx))
        .await
        .unwrap();
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_allowed_datacenters_are_filtered_by_enterprise() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        &format!("{API}/admin/datacenters?idEnterprise=1"),
        StatusCode::OK,
        &format!(
            "<datacenters><datacenter><link rel=\"edit\" href=\"{DATACENTER}\"/><id>4</id>\
             <name>Barcelona</name></datacenter></datacenters>"
        ),
    );
    let ctx = context(&mock);

    let allowed = persisted_enterprise(&ctx).list_allowed_datacenters().await.unwrap();
    assert_eq!(allowed.len(), 1);
    assert_eq!(allowed[0].name().unwrap(), Some("Barcelona"));
}

// ==================== Navigation ====================

#[tokio::test]
async fn test_virtual_machine_enterprise_follows_link() {
    let mock = MockTransport::new();
    mock.on(Method::GET, ENTERPRISE, StatusCode::OK, &enterprise_xml("Abiquo"));
    let ctx = context(&mock);
    let mut dto = VirtualMachineDto::default();
    dto.links.push(link("edit", VM));
    dto.links.push(link("enterprise", ENTERPRISE));
    let vm = VirtualMachine::wrap(&ctx, dto);

    let enterprise = vm.enterprise().await.unwrap().unwrap();
    assert_eq!(enterprise.name().unwrap(), Some("Abiquo"));
}

#[tokio::test]
async fn test_virtual_datacenter_without_enterprise_link() {
    let mock = MockTransport::new();
    let ctx = context(&mock);
    let mut dto = VirtualDatacenterDto::default();
    dto.links.push(link("edit", VDC));
    let vdc = VirtualDatacenter::wrap(&ctx, dto);

    let err = vdc.enterprise().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingLink);
    assert!(mock.requests().is_empty());
}

// ==================== Search ====================

#[tokio::test]
async fn test_search_enterprises_pages_on_the_server() {
    let mock = MockTransport::new();
    let url = format!("{API}/admin/enterprises?startwith=10&limit=10&has=abi");
    mock.on(
        Method::GET,
        &url,
        StatusCode::OK,
        &format!("<enterprises>{}</enterprises>", enterprise_xml("Abiquo")),
    );
    let ctx = context(&mock);

    let page = ctx
        .search()
        .search_enterprises(&EnterpriseOptions::default().has("abi").start_with(10).limit(10))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(mock.requests_to(&Method::GET, &url).len(), 1);
}

#[tokio::test]
async fn test_search_private_ips_pages_the_pool() {
    let mock = MockTransport::new();
    let network = format!("{VDC}/privatenetworks/7");
    mock.on(
        Method::GET,
        &network,
        StatusCode::OK,
        &format!(
            "<network><link rel=\"edit\" href=\"{network}\"/>\
             <link rel=\"ips\" href=\"{network}/ips\"/><id>7</id><name>lan</name>\
             <type>INTERNAL</type></network>"
        ),
    );
    mock.on(
        Method::GET,
        &format!("{network}/ips?limit=2"),
        StatusCode::OK,
        "<ipsPoolManagement><ipPoolManagement><id>1</id><ip>10.0.0.2</ip>\
         <available>true</available></ipPoolManagement><ipPoolManagement><id>2</id>\
         <ip>10.0.0.3</ip></ipPoolManagement></ipsPoolManagement>",
    );
    let ctx = context(&mock);
    let mut dto = VirtualDatacenterDto::default();
    dto.links.push(link("edit", VDC));
    dto.links.push(link("privatenetworks", format!("{VDC}/privatenetworks")));
    let vdc = VirtualDatacenter::wrap(&ctx, dto);

    let lan = vdc.get_private_network(7).await.unwrap().unwrap();
    let ips = ctx
        .search()
        .search_private_ips(&lan, &IpOptions::default().limit(2))
        .await
        .unwrap();

    let addresses: Vec<Option<&str>> = ips.iter().map(|ip| ip.ip().unwrap()).collect();
    assert_eq!(addresses, [Some("10.0.0.2"), Some("10.0.0.3")]);
}
