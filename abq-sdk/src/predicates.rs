//! Ready-made filters for the `*_matching` and `find_*` helpers.
//!
//! Each predicate holds an owned copy of its arguments, so it can be built
//! once and reused across listings. A wrapper that has been deleted never
//! matches.

fn owned<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Vec<String> {
    values.into_iter().map(Into::into).collect()
}

fn contains(values: &[String], value: Option<&str>) -> bool {
    value.is_some_and(|value| values.iter().any(|v| v == value))
}

pub mod enterprise {
    use super::{contains, owned};
    use crate::admin::Enterprise;

    pub fn name<S: Into<String>>(names: impl IntoIterator<Item = S>) -> impl Fn(&Enterprise) -> bool {
        let names = owned(names);
        move |enterprise| contains(&names, enterprise.name().ok().flatten())
    }
}

pub mod ip {
    use super::{contains, owned};
    use crate::network::Ip;

    pub fn name<S: Into<String>>(names: impl IntoIterator<Item = S>) -> impl Fn(&Ip) -> bool {
        let names = owned(names);
        move |ip| contains(&names, ip.name().ok().flatten())
    }

    pub fn address<S: Into<String>>(addresses: impl IntoIterator<Item = S>) -> impl Fn(&Ip) -> bool {
        let addresses = owned(addresses);
        move |ip| contains(&addresses, ip.ip().ok().flatten())
    }

    pub fn available() -> impl Fn(&Ip) -> bool {
        |ip| ip.available().unwrap_or(false)
    }
}

pub mod vm {
    use abq_api::types::VirtualMachineState;

    use super::{contains, owned};
    use crate::cloud::VirtualMachine;

    pub fn name<S: Into<String>>(names: impl IntoIterator<Item = S>) -> impl Fn(&VirtualMachine) -> bool {
        let names = owned(names);
        move |vm| contains(&names, vm.name().ok().flatten())
    }

    /// Matches on the state as last fetched.
    pub fn state(states: impl IntoIterator<Item = VirtualMachineState>) -> impl Fn(&VirtualMachine) -> bool {
        let states: Vec<_> = states.into_iter().collect();
        move |vm| {
            vm.cached_state()
                .ok()
                .flatten()
                .is_some_and(|state| states.contains(&state))
        }
    }
}

pub mod volume {
    use super::{contains, owned};
    use crate::cloud::Volume;

    pub fn name<S: Into<String>>(names: impl IntoIterator<Item = S>) -> impl Fn(&Volume) -> bool {
        let names = owned(names);
        move |volume| contains(&names, volume.name().ok().flatten())
    }

    pub fn state<S: Into<String>>(states: impl IntoIterator<Item = S>) -> impl Fn(&Volume) -> bool {
        let states = owned(states);
        move |volume| contains(&states, volume.state().ok().flatten())
    }
}

pub mod task {
    use super::{contains, owned};
    use crate::task::{AsyncTask, TaskStatus};

    pub fn status(statuses: impl IntoIterator<Item = TaskStatus>) -> impl Fn(&AsyncTask) -> bool {
        let statuses: Vec<_> = statuses.into_iter().collect();
        move |task| statuses.contains(&task.status())
    }

    /// Matches the server task type, e.g. `DEPLOY` or `RECONFIGURE`.
    pub fn task_type<S: Into<String>>(types: impl IntoIterator<Item = S>) -> impl Fn(&AsyncTask) -> bool {
        let types = owned(types);
        move |task| contains(&types, Some(task.task_type()))
    }
}

pub mod remote_service {
    use abq_api::types::RemoteServiceType;

    use crate::infrastructure::RemoteService;

    pub fn service_type(
        types: impl IntoIterator<Item = RemoteServiceType>,
    ) -> impl Fn(&RemoteService) -> bool {
        let types: Vec<_> = types.into_iter().collect();
        move |service| service.service_type().is_ok_and(|t| types.contains(&t))
    }
}

#[cfg(test)]
mod tests {
    use abq_api::Credentials;
    use abq_api::types::{IpPoolManagementDto, VirtualMachineDto, VirtualMachineState};

    use super::*;
    use crate::cloud::VirtualMachine;
    use crate::context::AbiquoContext;
    use crate::network::Ip;

    fn context() -> AbiquoContext {
        AbiquoContext::builder("http://abiquo.test/api", Credentials::basic("u", "p"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_ip_predicates() {
        let ctx = context();
        let free = Ip::wrap(
            &ctx,
            IpPoolManagementDto {
                ip: Some("10.0.0.2".into()),
                available: true,
                ..Default::default()
            },
        );
        let used = Ip::wrap(
            &ctx,
            IpPoolManagementDto {
                ip: Some("10.0.0.3".into()),
                ..Default::default()
            },
        );
        assert!(ip::available()(&free));
        assert!(!ip::available()(&used));
        assert!(ip::address(["10.0.0.3", "10.0.0.9"])(&used));
        assert!(!ip::address(["10.0.0.3"])(&free));
    }

    #[test]
    fn test_vm_state_uses_cached_state() {
        let ctx = context();
        let vm = VirtualMachine::wrap(
            &ctx,
            VirtualMachineDto {
                name: Some("vm1".into()),
                state: Some(VirtualMachineState::On),
                ..Default::default()
            },
        );
        assert!(vm::state([VirtualMachineState::On, VirtualMachineState::Paused])(&vm));
        assert!(!vm::state([VirtualMachineState::Off])(&vm));
        assert!(vm::name(["vm1"])(&vm));
    }
}
