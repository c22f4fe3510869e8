//! Link-reference payloads.
//!
//! Operations that attach or replace related resources do not send the
//! resources themselves but a `<links>` document pointing at them.

use crate::link::{MissingLink, RestLink, rel};
use crate::types::{
    DiskManagementDto, IpPoolManagementDto, LinksDto, NetworkType, Resource, VlanNetworkDto,
    VolumeManagementDto,
};

/// References to volumes by their `edit` link. Duplicates are sent once.
pub fn volume_refs<'a>(
    volumes: impl IntoIterator<Item = &'a VolumeManagementDto>,
) -> Result<LinksDto, MissingLink> {
    edit_refs(volumes, rel::VOLUME)
}

/// References to hard disks by their `edit` link. Duplicates are sent once.
pub fn hard_disk_refs<'a>(
    disks: impl IntoIterator<Item = &'a DiskManagementDto>,
) -> Result<LinksDto, MissingLink> {
    edit_refs(disks, rel::DISK)
}

/// References to pool IPs: the `self` link, with the link title (which names
/// the kind of network the IP belongs to) as relation.
pub fn ip_refs<'a>(
    ips: impl IntoIterator<Item = &'a IpPoolManagementDto>,
) -> Result<LinksDto, MissingLink> {
    let mut links: Vec<RestLink> = Vec::new();
    for ip in ips {
        let own = ip.link(rel::SELF)?;
        let relation = own.title.clone().unwrap_or_else(|| rel::PRIVATE_NETWORK.to_owned());
        push_unique(&mut links, RestLink::new(relation, own.href.clone()));
    }
    Ok(LinksDto::new(links))
}

/// Reference to a single network, with the relation given by its type.
pub fn network_ref(network: &VlanNetworkDto) -> Result<LinksDto, MissingLink> {
    let href = network.edit_link()?.href.clone();
    Ok(LinksDto::new([RestLink::new(
        network_ref_rel(network.network_type),
        href,
    )]))
}

fn network_ref_rel(network_type: NetworkType) -> &'static str {
    match network_type {
        NetworkType::Internal => rel::INTERNAL_NETWORK,
        NetworkType::Public => rel::PUBLIC_NETWORK,
        NetworkType::External | NetworkType::ExternalUnmanaged => rel::EXTERNAL_NETWORK,
        NetworkType::Unmanaged => rel::UNMANAGED_NETWORK,
    }
}

fn edit_refs<'a, R: Resource>(
    resources: impl IntoIterator<Item = &'a R>,
    relation: &str,
) -> Result<LinksDto, MissingLink> {
    let mut links: Vec<RestLink> = Vec::new();
    for resource in resources {
        let href = resource.edit_link()?.href.clone();
        push_unique(&mut links, RestLink::new(relation, href));
    }
    Ok(LinksDto::new(links))
}

fn push_unique(links: &mut Vec<RestLink>, link: RestLink) {
    if !links.contains(&link) {
        links.push(link);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::encode;

    const VOLUME: &str = "http://localhost/api/cloud/virtualdatacenters/1/volumes/1";

    fn volume(href: &str) -> VolumeManagementDto {
        VolumeManagementDto {
            links: vec![RestLink::new("edit", href)].into(),
            name: Some("Volume".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_refs_serialize_as_empty_links() {
        let payload = volume_refs(Vec::<&VolumeManagementDto>::new()).unwrap();
        assert_eq!(encode(&payload).unwrap(), "<links/>");
    }

    #[test]
    fn test_volume_refs_point_at_edit_links() {
        let payload = volume_refs(&[volume(VOLUME)]).unwrap();
        assert_eq!(
            encode(&payload).unwrap(),
            format!("<links><link href=\"{VOLUME}\" rel=\"volume\"/></links>")
        );
    }

    #[test]
    fn test_duplicate_volumes_are_sent_once() {
        let volume = volume(VOLUME);
        let second = self::volume(&format!("{VOLUME}second"));
        let payload = volume_refs([&volume, &volume, &second]).unwrap();

        assert_eq!(payload.links.len(), 2);
        assert_eq!(payload.links.iter().next().unwrap().href, VOLUME);
    }

    #[test]
    fn test_unsaved_volume_is_rejected() {
        let err = volume_refs(&[VolumeManagementDto::default()]).unwrap_err();
        assert_eq!(err.rel, "edit");
    }

    #[test]
    fn test_ip_refs_use_self_link_title_as_relation() {
        let ip = IpPoolManagementDto {
            links: vec![
                RestLink::new("self", "http://localhost/api/cloud/virtualdatacenters/1/privatenetworks/1/ips/1")
                    .with_title("privateip"),
            ]
            .into(),
            ..Default::default()
        };
        let payload = ip_refs([&ip]).unwrap();
        let link = payload.links.iter().next().unwrap();
        assert_eq!(link.rel, "privateip");
        assert!(link.title.is_none());
    }

    #[test]
    fn test_network_ref_relation_follows_type() {
        let mut network = VlanNetworkDto::new(NetworkType::Internal);
        network.links.upsert("edit", "http://localhost/api/cloud/virtualdatacenters/1/privatenetworks/1");
        assert_eq!(
            encode(&network_ref(&network).unwrap()).unwrap(),
            "<links><link href=\"http://localhost/api/cloud/virtualdatacenters/1/privatenetworks/1\" rel=\"internalnetwork\"/></links>"
        );

        network.network_type = NetworkType::External;
        assert_eq!(network_ref(&network).unwrap().links.iter().next().unwrap().rel, "externalnetwork");
    }
}
