use abq_api::link::rel;
use abq_api::types::{
    DiskManagementDto, IpPoolManagementDto, Resource, VirtualApplianceDto, VirtualMachineDto,
    VirtualMachineState, VirtualMachineStateDto, VirtualMachineTaskDto, VirtualMachineTemplateDto,
    VolumeManagementDto,
};
use tracing::info;

use crate::admin::Enterprise;
use crate::cloud::{HardDisk, VirtualAppliance, VirtualDatacenter, VirtualMachineTemplate, Volume};
use crate::context::AbiquoContext;
use crate::error::{Error, Result};
use crate::network::{Ip, Nic};
use crate::task::{AsyncTask, sort_most_recent_first};
use crate::wrapper::{DomainWrapper, filter, find_first, wrap_all, wrapper};

/// A virtual machine inside a virtual appliance.
#[derive(Debug, Clone)]
pub struct VirtualMachine {
    inner: DomainWrapper<VirtualMachineDto>,
    virtual_appliance: Option<VirtualApplianceDto>,
    template: Option<VirtualMachineTemplateDto>,
}

wrapper!(VirtualMachine, VirtualMachineDto);

impl VirtualMachine {
    fn from_inner(inner: DomainWrapper<VirtualMachineDto>) -> Self {
        Self {
            inner,
            virtual_appliance: None,
            template: None,
        }
    }

    /// Start building a virtual machine from `template` in
    /// `virtual_appliance`. Both must be persisted.
    pub fn builder(
        virtual_appliance: &VirtualAppliance,
        template: &VirtualMachineTemplate,
    ) -> Result<VirtualMachineBuilder> {
        let parent = virtual_appliance.inner().require_persisted()?.clone();
        let template = template.inner().require_persisted()?.clone();
        Ok(VirtualMachineBuilder {
            ctx: virtual_appliance.context().clone(),
            virtual_appliance: parent,
            template,
            name: None,
            description: None,
            cpu: None,
            ram: None,
            password: None,
            vdrp_ip: None,
            vdrp_port: None,
            id_state: None,
            id_type: None,
        })
    }

    // ===== Domain operations =====

    /// Create the virtual machine, pointing it at its template.
    pub async fn save(&mut self) -> Result<()> {
        let vapp = self.virtual_appliance.as_ref().ok_or_else(|| {
            Error::validation("virtual machine was not built with a parent virtual appliance")
        })?;
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| Error::validation("virtual machine was not built with a template"))?;
        let template_href = template.edit_link()?.href.clone();

        let target = self.inner.target_mut()?;
        target
            .links
            .upsert(rel::VIRTUAL_MACHINE_TEMPLATE, template_href);

        let created = self
            .context()
            .api()
            .create_virtual_machine(vapp, self.inner.target()?)
            .await?;
        info!(id = ?created.id, name = ?created.name, "created virtual machine");
        self.inner.replace(created);
        Ok(())
    }

    /// Reconfigure the virtual machine. A deployed machine is reconfigured
    /// by a server task; an undeployed one is updated in place.
    pub async fn update(&self) -> Result<Option<AsyncTask>> {
        let accepted = self.context().api().update_virtual_machine(self.target()?).await?;
        AsyncTask::from_accepted(self.context(), accepted).await
    }

    pub async fn delete(&mut self) -> Result<()> {
        self.inner.delete().await
    }

    pub async fn change_state(&self, state: VirtualMachineState) -> Result<AsyncTask> {
        let accepted = self
            .context()
            .api()
            .change_virtual_machine_state(self.target()?, &VirtualMachineStateDto { state })
            .await?;
        AsyncTask::from_required(self.context(), accepted).await
    }

    /// Fetch the current state and record it locally.
    pub async fn state(&mut self) -> Result<VirtualMachineState> {
        let current = self
            .context()
            .api()
            .get_virtual_machine_state(self.target()?)
            .await?
            .state;
        let target = self.inner.target_mut()?;
        target.state = Some(current);
        target.id_state = Some(current.id());
        Ok(current)
    }

    pub async fn deploy(&self, force_soft_limits: bool) -> Result<AsyncTask> {
        let options = VirtualMachineTaskDto {
            force_enterprise_soft_limits: force_soft_limits,
            ..Default::default()
        };
        let accepted = self
            .context()
            .api()
            .deploy_virtual_machine(self.target()?, &options)
            .await?;
        AsyncTask::from_required(self.context(), accepted).await
    }

    pub async fn undeploy(&self, force: bool) -> Result<AsyncTask> {
        let options = VirtualMachineTaskDto {
            force_undeploy: force,
            ..Default::default()
        };
        let accepted = self
            .context()
            .api()
            .undeploy_virtual_machine(self.target()?, &options)
            .await?;
        AsyncTask::from_required(self.context(), accepted).await
    }

    // ===== Parent access =====

    pub async fn virtual_appliance(&self) -> Result<VirtualAppliance> {
        let url = self
            .context()
            .api()
            .resolve(self.target()?, rel::VIRTUAL_APPLIANCE, &[])?;
        let dto = self.context().api().get::<VirtualApplianceDto>(url).await?;
        Ok(VirtualAppliance::wrap(self.context(), dto))
    }

    pub async fn virtual_datacenter(&self) -> Result<Option<VirtualDatacenter>> {
        let id = self.inner.id_from_link(rel::VIRTUAL_DATACENTER)?;
        let found = self.context().api().get_virtual_datacenter(id).await?;
        Ok(found.map(|dto| VirtualDatacenter::wrap(self.context(), dto)))
    }

    pub async fn enterprise(&self) -> Result<Option<Enterprise>> {
        let id = self.inner.id_from_link(rel::ENTERPRISE)?;
        let found = self.context().api().get_enterprise(id).await?;
        Ok(found.map(|dto| Enterprise::wrap(self.context(), dto)))
    }

    pub async fn template(&self) -> Result<VirtualMachineTemplate> {
        let dto = self
            .context()
            .api()
            .get_virtual_machine_template(self.target()?)
            .await?;
        Ok(VirtualMachineTemplate::wrap(self.context(), dto))
    }

    // ===== Children access =====

    pub async fn list_attached_hard_disks(&self) -> Result<Vec<HardDisk>> {
        let dtos = self.context().api().list_attached_hard_disks(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, HardDisk::wrap))
    }

    pub async fn list_attached_hard_disks_matching(
        &self,
        predicate: impl Fn(&HardDisk) -> bool,
    ) -> Result<Vec<HardDisk>> {
        Ok(filter(self.list_attached_hard_disks().await?, predicate))
    }

    pub async fn find_attached_hard_disk(
        &self,
        predicate: impl Fn(&HardDisk) -> bool,
    ) -> Result<Option<HardDisk>> {
        Ok(find_first(self.list_attached_hard_disks().await?, predicate))
    }

    pub async fn list_attached_volumes(&self) -> Result<Vec<Volume>> {
        let dtos = self.context().api().list_attached_volumes(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, Volume::wrap))
    }

    pub async fn list_attached_volumes_matching(
        &self,
        predicate: impl Fn(&Volume) -> bool,
    ) -> Result<Vec<Volume>> {
        Ok(filter(self.list_attached_volumes().await?, predicate))
    }

    pub async fn find_attached_volume(&self, predicate: impl Fn(&Volume) -> bool) -> Result<Option<Volume>> {
        Ok(find_first(self.list_attached_volumes().await?, predicate))
    }

    pub async fn list_attached_nics(&self) -> Result<Vec<Nic>> {
        let dtos = self.context().api().list_attached_nics(self.target()?).await?;
        Ok(wrap_all(self.context(), dtos, Nic::wrap))
    }

    pub async fn list_attached_nics_matching(&self, predicate: impl Fn(&Nic) -> bool) -> Result<Vec<Nic>> {
        Ok(filter(self.list_attached_nics().await?, predicate))
    }

    pub async fn find_attached_nic(&self, predicate: impl Fn(&Nic) -> bool) -> Result<Option<Nic>> {
        Ok(find_first(self.list_attached_nics().await?, predicate))
    }

    /// Tasks run on this machine, most recent first. Tasks sharing a
    /// timestamp keep the server order.
    pub async fn list_tasks(&self) -> Result<Vec<AsyncTask>> {
        let dtos = self.context().api().list_tasks(self.target()?).await?;
        let mut tasks = wrap_all(self.context(), dtos, AsyncTask::wrap);
        sort_most_recent_first(&mut tasks);
        Ok(tasks)
    }

    pub async fn list_tasks_matching(&self, predicate: impl Fn(&AsyncTask) -> bool) -> Result<Vec<AsyncTask>> {
        Ok(filter(self.list_tasks().await?, predicate))
    }

    pub async fn find_task(&self, predicate: impl Fn(&AsyncTask) -> bool) -> Result<Option<AsyncTask>> {
        Ok(find_first(self.list_tasks().await?, predicate))
    }

    // ===== Hard disks =====

    /// Attach `hard_disks` on top of the ones already attached.
    pub async fn attach_hard_disks(&self, hard_disks: &[&HardDisk]) -> Result<Option<AsyncTask>> {
        let mut expected = self.context().api().list_attached_hard_disks(self.target()?).await?;
        for disk in hard_disks {
            expected.push(disk.unwrap()?);
        }
        self.put_hard_disks(&expected).await
    }

    pub async fn detach_hard_disks(&self, hard_disks: &[&HardDisk]) -> Result<Option<AsyncTask>> {
        let ids = hard_disks
            .iter()
            .map(|disk| disk.id())
            .collect::<Result<Vec<_>>>()?;
        let mut expected = self.context().api().list_attached_hard_disks(self.target()?).await?;
        expected.retain(|disk| !ids.contains(&disk.id));
        self.put_hard_disks(&expected).await
    }

    pub async fn detach_all_hard_disks(&self) -> Result<Option<AsyncTask>> {
        let accepted = self.context().api().detach_all_hard_disks(self.target()?).await?;
        AsyncTask::from_accepted(self.context(), accepted).await
    }

    /// Make `hard_disks` the exact set of attached disks.
    pub async fn replace_hard_disks(&self, hard_disks: &[&HardDisk]) -> Result<Option<AsyncTask>> {
        let dtos = hard_disks
            .iter()
            .map(|disk| disk.unwrap())
            .collect::<Result<Vec<_>>>()?;
        self.put_hard_disks(&dtos).await
    }

    async fn put_hard_disks(&self, disks: &[DiskManagementDto]) -> Result<Option<AsyncTask>> {
        let accepted = self
            .context()
            .api()
            .replace_hard_disks(self.target()?, disks)
            .await?;
        AsyncTask::from_accepted(self.context(), accepted).await
    }

    // ===== Volumes =====

    pub async fn attach_volumes(&self, volumes: &[&Volume]) -> Result<Option<AsyncTask>> {
        let mut expected = self.context().api().list_attached_volumes(self.target()?).await?;
        for volume in volumes {
            expected.push(volume.unwrap()?);
        }
        self.put_volumes(&expected).await
    }

    pub async fn detach_volumes(&self, volumes: &[&Volume]) -> Result<Option<AsyncTask>> {
        let ids = volumes
            .iter()
            .map(|volume| volume.id())
            .collect::<Result<Vec<_>>>()?;
        let mut expected = self.context().api().list_attached_volumes(self.target()?).await?;
        expected.retain(|volume| !ids.contains(&volume.id));
        self.put_volumes(&expected).await
    }

    pub async fn detach_all_volumes(&self) -> Result<Option<AsyncTask>> {
        let accepted = self.context().api().detach_all_volumes(self.target()?).await?;
        AsyncTask::from_accepted(self.context(), accepted).await
    }

    pub async fn replace_volumes(&self, volumes: &[&Volume]) -> Result<Option<AsyncTask>> {
        let dtos = volumes
            .iter()
            .map(|volume| volume.unwrap())
            .collect::<Result<Vec<_>>>()?;
        self.put_volumes(&dtos).await
    }

    async fn put_volumes(&self, volumes: &[VolumeManagementDto]) -> Result<Option<AsyncTask>> {
        let accepted = self
            .context()
            .api()
            .replace_volumes(self.target()?, volumes)
            .await?;
        AsyncTask::from_accepted(self.context(), accepted).await
    }

    // ===== NICs =====

    /// Create a NIC bound to `ip`.
    pub async fn attach_nic(&self, ip: &Ip) -> Result<Option<AsyncTask>> {
        let accepted = self
            .context()
            .api()
            .create_nic(self.target()?, ip.target()?)
            .await?;
        AsyncTask::from_accepted(self.context(), accepted).await
    }

    pub async fn replace_nics(&self, ips: &[&Ip]) -> Result<Option<AsyncTask>> {
        let dtos: Vec<IpPoolManagementDto> = ips
            .iter()
            .map(|ip| ip.unwrap())
            .collect::<Result<Vec<_>>>()?;
        let accepted = self.context().api().replace_nics(self.target()?, &dtos).await?;
        AsyncTask::from_accepted(self.context(), accepted).await
    }

    pub async fn detach_nic(&self, nic: &mut Nic) -> Result<Option<AsyncTask>> {
        nic.delete().await
    }

    // ===== Delegate methods =====

    pub fn id(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id)
    }

    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.target()?.name.as_deref())
    }

    pub fn description(&self) -> Result<Option<&str>> {
        Ok(self.target()?.description.as_deref())
    }

    pub fn cpu(&self) -> Result<Option<i32>> {
        Ok(self.target()?.cpu)
    }

    pub fn ram(&self) -> Result<Option<i32>> {
        Ok(self.target()?.ram)
    }

    pub fn hd_in_bytes(&self) -> Result<Option<i64>> {
        Ok(self.target()?.hd_in_bytes)
    }

    pub fn password(&self) -> Result<Option<&str>> {
        Ok(self.target()?.password.as_deref())
    }

    pub fn uuid(&self) -> Result<Option<&str>> {
        Ok(self.target()?.uuid.as_deref())
    }

    pub fn vnc_address(&self) -> Result<Option<&str>> {
        Ok(self.target()?.vdrp_ip.as_deref())
    }

    pub fn vnc_port(&self) -> Result<Option<i32>> {
        Ok(self.target()?.vdrp_port)
    }

    pub fn id_state(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id_state)
    }

    pub fn id_type(&self) -> Result<Option<i32>> {
        Ok(self.target()?.id_type)
    }

    /// State as last seen; see [`state`](Self::state) for a fresh read.
    pub fn cached_state(&self) -> Result<Option<VirtualMachineState>> {
        Ok(self.target()?.state)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.name = Some(name.into());
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.description = Some(description.into());
        Ok(())
    }

    pub fn set_cpu(&mut self, cpu: i32) -> Result<()> {
        self.inner.target_mut()?.cpu = Some(cpu);
        Ok(())
    }

    pub fn set_ram(&mut self, ram: i32) -> Result<()> {
        self.inner.target_mut()?.ram = Some(ram);
        Ok(())
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> Result<()> {
        self.inner.target_mut()?.password = Some(password.into());
        Ok(())
    }
}

/// Builder for [`VirtualMachine`].
///
/// The disk size comes from the template. CPU and RAM are left to the
/// server unless set.
#[derive(Debug)]
pub struct VirtualMachineBuilder {
    ctx: AbiquoContext,
    virtual_appliance: VirtualApplianceDto,
    template: VirtualMachineTemplateDto,
    name: Option<String>,
    description: Option<String>,
    cpu: Option<i32>,
    ram: Option<i32>,
    password: Option<String>,
    vdrp_ip: Option<String>,
    vdrp_port: Option<i32>,
    id_state: Option<i32>,
    id_type: Option<i32>,
}

impl VirtualMachineBuilder {
    /// A builder carrying the settings of `vm`, which must itself come from
    /// a builder so that its appliance and template are known.
    pub fn from_virtual_machine(vm: &VirtualMachine) -> Result<Self> {
        let dto = vm.target()?;
        let (Some(virtual_appliance), Some(template)) = (&vm.virtual_appliance, &vm.template) else {
            return Err(Error::validation(
                "virtual machine does not carry its virtual appliance and template",
            ));
        };
        Ok(Self {
            ctx: vm.context().clone(),
            virtual_appliance: virtual_appliance.clone(),
            template: template.clone(),
            name: dto.name.clone(),
            description: dto.description.clone(),
            cpu: dto.cpu,
            ram: dto.ram,
            password: dto.password.clone(),
            vdrp_ip: dto.vdrp_ip.clone(),
            vdrp_port: dto.vdrp_port,
            id_state: dto.id_state,
            id_type: dto.id_type,
        })
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn cpu(mut self, cpu: i32) -> Self {
        self.cpu = Some(cpu);
        self
    }

    pub fn ram(mut self, ram: i32) -> Self {
        self.ram = Some(ram);
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Move the machine to another (persisted) virtual appliance.
    pub fn virtual_appliance(mut self, virtual_appliance: &VirtualAppliance) -> Result<Self> {
        self.virtual_appliance = virtual_appliance.inner().require_persisted()?.clone();
        Ok(self)
    }

    pub fn build(self) -> VirtualMachine {
        let dto = VirtualMachineDto {
            name: self.name,
            description: self.description,
            cpu: self.cpu,
            ram: self.ram,
            hd_in_bytes: self.template.hd_required,
            password: self.password,
            vdrp_ip: self.vdrp_ip,
            vdrp_port: self.vdrp_port,
            id_state: self.id_state,
            id_type: self.id_type,
            ..Default::default()
        };
        VirtualMachine {
            inner: DomainWrapper::new(self.ctx, dto),
            virtual_appliance: Some(self.virtual_appliance),
            template: Some(self.template),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use abq_api::mock::MockTransport;
    use abq_api::{Credentials, Method, RestLink, StatusCode};

    use super::*;

    const ENDPOINT: &str = "http://abiquo.test/api";

    fn context(mock: &MockTransport) -> AbiquoContext {
        AbiquoContext::builder(ENDPOINT, Credentials::basic("admin", "xabiquo"))
            .transport(Arc::new(mock.clone()))
            .build()
            .unwrap()
    }

    fn template(ctx: &AbiquoContext) -> VirtualMachineTemplate {
        let mut dto = VirtualMachineTemplateDto {
            hd_required: Some(20 * 1024 * 1024),
            ..Default::default()
        };
        dto.links.push(RestLink::new(
            "edit",
            format!("{ENDPOINT}/admin/enterprises/1/datacenterrepositories/1/virtualmachinetemplates/7"),
        ));
        VirtualMachineTemplate::wrap(ctx, dto)
    }

    fn vapp(ctx: &AbiquoContext) -> VirtualAppliance {
        let mut dto = VirtualApplianceDto::default();
        dto.links.push(RestLink::new(
            "edit",
            format!("{ENDPOINT}/cloud/virtualdatacenters/1/virtualappliances/2"),
        ));
        dto.links.push(RestLink::new(
            "virtualmachines",
            format!("{ENDPOINT}/cloud/virtualdatacenters/1/virtualappliances/2/virtualmachines"),
        ));
        VirtualAppliance::wrap(ctx, dto)
    }

    #[test]
    fn test_build_takes_disk_size_from_template() {
        let mock = MockTransport::new();
        let ctx = context(&mock);
        let vm = VirtualMachine::builder(&vapp(&ctx), &template(&ctx))
            .unwrap()
            .name("vm1")
            .cpu(2)
            .build();
        assert!(!vm.is_persisted());
        assert_eq!(vm.hd_in_bytes().unwrap(), Some(20 * 1024 * 1024));
        assert_eq!(vm.ram().unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_points_vm_at_template() {
        let mock = MockTransport::new();
        let url = format!("{ENDPOINT}/cloud/virtualdatacenters/1/virtualappliances/2/virtualmachines");
        mock.on(
            Method::POST,
            &url,
            StatusCode::CREATED,
            "<virtualMachine><link rel=\"edit\" href=\"http://abiquo.test/api/vm/9\"/><id>9</id><name>vm1</name></virtualMachine>",
        );
        let ctx = context(&mock);
        let mut vm = VirtualMachine::builder(&vapp(&ctx), &template(&ctx))
            .unwrap()
            .name("vm1")
            .build();
        vm.save().await.unwrap();

        assert_eq!(vm.id().unwrap(), Some(9));
        let sent = mock.requests_to(&Method::POST, &url);
        let body = sent[0].body.as_deref().unwrap();
        assert!(body.contains("rel=\"virtualmachinetemplate\""));
        assert!(body.contains("virtualmachinetemplates/7"));
    }

    #[test]
    fn test_from_fetched_vm_is_rejected() {
        let mock = MockTransport::new();
        let ctx = context(&mock);
        let vm = VirtualMachine::wrap(&ctx, VirtualMachineDto::default());
        let err = VirtualMachineBuilder::from_virtual_machine(&vm).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_from_virtual_machine_copies_settings() {
        let mock = MockTransport::new();
        let ctx = context(&mock);
        let original = VirtualMachine::builder(&vapp(&ctx), &template(&ctx))
            .unwrap()
            .name("vm1")
            .cpu(2)
            .ram(512)
            .password("secret")
            .build();
        let copy = VirtualMachineBuilder::from_virtual_machine(&original)
            .unwrap()
            .build();
        assert_eq!(copy.name().unwrap(), Some("vm1"));
        assert_eq!(copy.cpu().unwrap(), Some(2));
        assert_eq!(copy.ram().unwrap(), Some(512));
        assert_eq!(copy.password().unwrap(), Some("secret"));
    }
}
