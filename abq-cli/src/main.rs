use std::time::Duration;

use abiquo::api::{Credentials, EnterpriseOptions, VirtualDatacenterOptions};
use abiquo::sdk::admin::Enterprise;
use abiquo::sdk::cloud::{VirtualDatacenter, VirtualMachine};
use abiquo::sdk::infrastructure::{Datacenter, RemoteService};
use abiquo::sdk::{AbiquoContext, AsyncTask, Result as SdkResult};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Parser)]
#[command(
    name = "abq",
    version,
    about = "Command line client for the Abiquo cloud management API"
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Print JSON instead of key=value lines.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Args)]
struct ConnectionArgs {
    /// API endpoint, e.g. `http://10.60.1.4/api`.
    #[arg(long, env = "ABIQUO_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// User name, or session token when no credential is given.
    #[arg(long, env = "ABIQUO_IDENTITY", global = true)]
    identity: Option<String>,

    /// Password.
    #[arg(long, env = "ABIQUO_CREDENTIAL", hide_env_values = true, global = true)]
    credential: Option<String>,

    /// Delay between two task status requests (milliseconds).
    #[arg(long, global = true, default_value_t = 5000)]
    poll_interval_ms: u64,

    /// Concurrent requests when listing across parents.
    #[arg(long, global = true, default_value_t = 10)]
    max_threads: usize,

    /// HTTP request timeout (seconds).
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List datacenters.
    Datacenters,
    /// List the remote services of a datacenter.
    RemoteServices {
        /// Datacenter id.
        #[arg(long)]
        datacenter: i32,
    },
    /// List enterprises, optionally only those whose name contains a text.
    Enterprises {
        /// Text the enterprise name must contain.
        #[arg(long)]
        has: Option<String>,
    },
    /// List virtual datacenters.
    Vdcs,
    /// List virtual machines, of one virtual datacenter or of all of them.
    Vms {
        /// Virtual datacenter id.
        #[arg(long)]
        vdc: Option<i32>,
    },
    /// Print the current state of a virtual machine.
    State(VmArgs),
    /// List the tasks of a virtual machine, most recent first.
    Tasks(VmArgs),
    /// Deploy a virtual machine.
    Deploy(TaskArgs),
    /// Undeploy a virtual machine.
    Undeploy(TaskArgs),
}

#[derive(Debug, Clone, Args)]
struct VmArgs {
    /// Virtual datacenter id.
    #[arg(long)]
    vdc: i32,

    /// Virtual appliance id.
    #[arg(long)]
    vapp: i32,

    /// Virtual machine id.
    #[arg(long)]
    vm: i32,
}

#[derive(Debug, Clone, Args)]
struct TaskArgs {
    #[command(flatten)]
    target: VmArgs,

    /// Deploy: ignore enterprise soft limits. Undeploy: force it.
    #[arg(long, default_value_t = false)]
    force: bool,

    /// Wait up to this many seconds for the task to finish.
    #[arg(long)]
    wait_secs: Option<u64>,
}

#[derive(Debug, Serialize)]
struct DatacenterRow {
    id: Option<i32>,
    name: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Serialize)]
struct RemoteServiceRow {
    id: Option<i32>,
    service_type: String,
    uri: Option<String>,
    status: i32,
}

#[derive(Debug, Serialize)]
struct EnterpriseRow {
    id: Option<i32>,
    name: Option<String>,
    cpu_hard: i32,
    ram_hard_mb: i32,
}

#[derive(Debug, Serialize)]
struct VirtualDatacenterRow {
    id: Option<i32>,
    name: Option<String>,
    hypervisor_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct VirtualMachineRow {
    id: Option<i32>,
    name: Option<String>,
    state: Option<String>,
    cpu: Option<i32>,
    ram: Option<i32>,
}

impl DatacenterRow {
    fn of(dc: &Datacenter) -> SdkResult<Self> {
        Ok(Self {
            id: dc.id()?,
            name: dc.name()?.map(str::to_owned),
            location: dc.location()?.map(str::to_owned),
        })
    }
}

impl RemoteServiceRow {
    fn of(rs: &RemoteService) -> SdkResult<Self> {
        Ok(Self {
            id: rs.id()?,
            service_type: rs.service_type()?.to_string(),
            uri: rs.uri()?.map(str::to_owned),
            status: rs.status()?,
        })
    }
}

impl EnterpriseRow {
    fn of(enterprise: &Enterprise) -> SdkResult<Self> {
        let limits = enterprise.limits()?;
        Ok(Self {
            id: enterprise.id()?,
            name: enterprise.name()?.map(str::to_owned),
            cpu_hard: limits.cpu_hard,
            ram_hard_mb: limits.ram_hard_mb,
        })
    }
}

impl VirtualDatacenterRow {
    fn of(vdc: &VirtualDatacenter) -> SdkResult<Self> {
        Ok(Self {
            id: vdc.id()?,
            name: vdc.name()?.map(str::to_owned),
            hypervisor_type: vdc.hypervisor_type()?.map(str::to_owned),
        })
    }
}

impl VirtualMachineRow {
    fn of(vm: &VirtualMachine) -> SdkResult<Self> {
        Ok(Self {
            id: vm.id()?,
            name: vm.name()?.map(str::to_owned),
            state: vm.cached_state()?.map(|s| s.to_string()),
            cpu: vm.cpu()?,
            ram: vm.ram()?,
        })
    }
}

#[derive(Debug, Serialize)]
struct StateRow {
    vm: i32,
    state: String,
}

#[derive(Debug, Serialize)]
struct TaskRow {
    task_id: String,
    task_type: String,
    status: String,
    timestamp: i64,
}

impl From<&AsyncTask> for TaskRow {
    fn from(task: &AsyncTask) -> Self {
        Self {
            task_id: task.task_id().to_owned(),
            task_type: task.task_type().to_owned(),
            status: task.status().to_string(),
            timestamp: task.timestamp(),
        }
    }
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = build_context(&cli.connection)?;
    let out = Output { json: cli.json };
    match cli.command {
        Commands::Datacenters => datacenters(&ctx, out).await?,
        Commands::RemoteServices { datacenter } => remote_services(&ctx, out, datacenter).await?,
        Commands::Enterprises { has } => enterprises(&ctx, out, has).await?,
        Commands::Vdcs => vdcs(&ctx, out).await?,
        Commands::Vms { vdc } => vms(&ctx, out, vdc).await?,
        Commands::State(args) => state(&ctx, out, &args).await?,
        Commands::Tasks(args) => tasks(&ctx, out, &args).await?,
        Commands::Deploy(args) => run_task(&ctx, out, &args, Action::Deploy).await?,
        Commands::Undeploy(args) => run_task(&ctx, out, &args, Action::Undeploy).await?,
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Validates every flag before anything is sent.
fn build_context(args: &ConnectionArgs) -> CliResult<AbiquoContext> {
    if args.poll_interval_ms == 0 {
        return Err(invalid_input("--poll-interval-ms must be greater than 0").into());
    }
    if args.max_threads == 0 {
        return Err(invalid_input("--max-threads must be greater than 0").into());
    }
    if args.timeout_secs == Some(0) {
        return Err(invalid_input("--timeout-secs must be greater than 0").into());
    }
    let endpoint = args
        .endpoint
        .clone()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| invalid_input("--endpoint (or ABIQUO_ENDPOINT) is required"))?;
    let identity = args
        .identity
        .clone()
        .filter(|i| !i.is_empty())
        .ok_or_else(|| invalid_input("--identity (or ABIQUO_IDENTITY) is required"))?;

    let credentials = Credentials::from_identity(identity, args.credential.clone());
    let mut builder = AbiquoContext::builder(endpoint, credentials)
        .async_task_monitor_delay(Duration::from_millis(args.poll_interval_ms))
        .max_scheduler_threads(args.max_threads);
    if let Some(secs) = args.timeout_secs {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

async fn datacenters(ctx: &AbiquoContext, out: Output) -> CliResult<()> {
    let rows = ctx
        .infrastructure()
        .list_datacenters()
        .await?
        .iter()
        .map(DatacenterRow::of)
        .collect::<SdkResult<Vec<_>>>()?;
    out.rows(&rows)
}

async fn remote_services(ctx: &AbiquoContext, out: Output, datacenter_id: i32) -> CliResult<()> {
    let datacenter = ctx
        .infrastructure()
        .get_datacenter(datacenter_id)
        .await?
        .ok_or_else(|| not_found(format!("datacenter {datacenter_id}")))?;
    let rows = datacenter
        .list_remote_services()
        .await?
        .iter()
        .map(RemoteServiceRow::of)
        .collect::<SdkResult<Vec<_>>>()?;
    out.rows(&rows)
}

async fn enterprises(ctx: &AbiquoContext, out: Output, has: Option<String>) -> CliResult<()> {
    let found = match has {
        Some(text) => {
            ctx.search()
                .search_enterprises(&EnterpriseOptions::default().has(text))
                .await?
        }
        None => ctx.administration().list_enterprises().await?,
    };
    let rows = found
        .iter()
        .map(EnterpriseRow::of)
        .collect::<SdkResult<Vec<_>>>()?;
    out.rows(&rows)
}

async fn vdcs(ctx: &AbiquoContext, out: Output) -> CliResult<()> {
    let rows = ctx
        .cloud()
        .list_virtual_datacenters(VirtualDatacenterOptions::default())
        .await?
        .iter()
        .map(VirtualDatacenterRow::of)
        .collect::<SdkResult<Vec<_>>>()?;
    out.rows(&rows)
}

async fn vms(ctx: &AbiquoContext, out: Output, vdc_id: Option<i32>) -> CliResult<()> {
    let machines = match vdc_id {
        Some(id) => {
            let vdc = ctx
                .cloud()
                .get_virtual_datacenter(id)
                .await?
                .ok_or_else(|| not_found(format!("virtual datacenter {id}")))?;
            let fan_out = ctx.fan_out();
            fan_out
                .within("list virtual machines", async {
                    let vapps = vdc.list_virtual_appliances().await?;
                    fan_out
                        .flat_map(vapps, |vapp| async move { vapp.list_virtual_machines().await })
                        .await
                })
                .await?
        }
        None => ctx.cloud().list_virtual_machines().await?,
    };
    debug!(count = machines.len(), "listed virtual machines");

    let rows = machines
        .iter()
        .map(VirtualMachineRow::of)
        .collect::<SdkResult<Vec<_>>>()?;
    out.rows(&rows)
}

async fn state(ctx: &AbiquoContext, out: Output, args: &VmArgs) -> CliResult<()> {
    let mut vm = locate_vm(ctx, args).await?;
    let state = vm.state().await?;
    out.rows(&[StateRow {
        vm: args.vm,
        state: state.to_string(),
    }])
}

async fn tasks(ctx: &AbiquoContext, out: Output, args: &VmArgs) -> CliResult<()> {
    let vm = locate_vm(ctx, args).await?;
    let rows: Vec<TaskRow> = vm.list_tasks().await?.iter().map(TaskRow::from).collect();
    out.rows(&rows)
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Deploy,
    Undeploy,
}

async fn run_task(ctx: &AbiquoContext, out: Output, args: &TaskArgs, action: Action) -> CliResult<()> {
    let vm = locate_vm(ctx, &args.target).await?;
    let task = match action {
        Action::Deploy => vm.deploy(args.force).await?,
        Action::Undeploy => vm.undeploy(args.force).await?,
    };
    let task = match args.wait_secs {
        Some(secs) => {
            ctx.task_monitor()
                .await_completion(&task, Duration::from_secs(secs))
                .await?
        }
        None => task,
    };
    out.rows(&[TaskRow::from(&task)])
}

async fn locate_vm(ctx: &AbiquoContext, args: &VmArgs) -> CliResult<VirtualMachine> {
    let vdc = ctx
        .cloud()
        .get_virtual_datacenter(args.vdc)
        .await?
        .ok_or_else(|| not_found(format!("virtual datacenter {}", args.vdc)))?;
    let vapp = vdc
        .get_virtual_appliance(args.vapp)
        .await?
        .ok_or_else(|| not_found(format!("virtual appliance {}", args.vapp)))?;
    let vm = vapp
        .get_virtual_machine(args.vm)
        .await?
        .ok_or_else(|| not_found(format!("virtual machine {}", args.vm)))?;
    Ok(vm)
}

#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    /// One JSON array, or one line of `key=value` pairs per row.
    fn rows<T: Serialize>(&self, rows: &[T]) -> CliResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(rows)?);
            return Ok(());
        }
        for row in rows {
            if let Some(line) = plain_line(row)? {
                println!("{line}");
            }
        }
        Ok(())
    }
}

/// `key=value` pairs in field declaration order.
fn plain_line<T: Serialize>(row: &T) -> CliResult<Option<String>> {
    let serde_json::Value::Object(fields) = serde_json::to_value(row)? else {
        return Ok(None);
    };
    let pairs: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{key}={}", plain(value)))
        .collect();
    Ok(Some(pairs.join(" ")))
}

fn plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn invalid_input(message: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, message.to_owned())
}

fn not_found(what: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotFound, format!("{what} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_line_keeps_field_order() {
        let row = VirtualMachineRow {
            id: Some(3),
            name: Some("web".into()),
            state: Some("ON".into()),
            cpu: Some(2),
            ram: None,
        };
        let line = plain_line(&row).unwrap().unwrap();
        assert_eq!(line, "id=3 name=web state=ON cpu=2 ram=");
    }

    #[test]
    fn test_plain_line_of_datacenter_row() {
        let row = DatacenterRow {
            id: Some(1),
            name: Some("Barcelona".into()),
            location: Some("bcn".into()),
        };
        assert_eq!(plain_line(&row).unwrap().unwrap(), "id=1 name=Barcelona location=bcn");
    }
}
