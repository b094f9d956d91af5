//! Static endpoint catalog for the Meraki Dashboard API v1.
//!
//! Each [`EndpointSpec`] carries the method name (Meraki SDK naming), the
//! HTTP route, and an ordered parameter table. The parameter table is the
//! signature-inspection source: it is built here once, at compile time,
//! instead of being reflected off callables per request.
//!
//! This is a representative production subset of the dashboard surface, not
//! the full several-hundred-endpoint catalog. Parameters that appear as
//! `{placeholders}` in the path are substituted into the URL; the rest
//! travel as query parameters (GET/DELETE) or as the JSON body (POST/PUT).

use serde_json::Value;

/// HTTP verb for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
        }
    }

    /// Whether this verb carries arguments in the request body rather than
    /// the query string.
    pub fn has_body(self) -> bool {
        matches!(self, HttpVerb::Post | HttpVerb::Put)
    }
}

/// Default value for an optional parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Int(i64),
    Bool(bool),
    Str(&'static str),
}

impl DefaultValue {
    pub fn to_json(self) -> Value {
        match self {
            DefaultValue::Int(n) => Value::from(n),
            DefaultValue::Bool(b) => Value::from(b),
            DefaultValue::Str(s) => Value::from(s),
        }
    }
}

/// One declared parameter of an endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub required: bool,
    pub default: Option<DefaultValue>,
}

impl ParamSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            default: None,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            default: None,
        }
    }

    pub const fn with_default(name: &'static str, default: DefaultValue) -> Self {
        Self {
            name,
            required: false,
            default: Some(default),
        }
    }
}

/// One callable dashboard endpoint.
#[derive(Debug, Clone, Copy)]
pub struct EndpointSpec {
    /// Method name in Meraki SDK style (e.g. `getDevice`).
    pub name: &'static str,
    pub verb: HttpVerb,
    /// Path template under the API base URL, with `{param}` placeholders.
    pub path: &'static str,
    pub params: &'static [ParamSpec],
}

/// A named group of endpoints (SDK "section").
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub name: &'static str,
    pub endpoints: &'static [EndpointSpec],
}

use DefaultValue::Int;
use HttpVerb::{Delete, Get, Post, Put};
use ParamSpec as P;

/// The full catalog, grouped by section.
pub const CATALOG: &[SectionSpec] = &[
    SectionSpec {
        name: "organizations",
        endpoints: &[
            EndpointSpec {
                name: "getOrganizations",
                verb: Get,
                path: "/organizations",
                params: &[],
            },
            EndpointSpec {
                name: "getOrganization",
                verb: Get,
                path: "/organizations/{organizationId}",
                params: &[P::required("organizationId")],
            },
            EndpointSpec {
                name: "getOrganizationDevices",
                verb: Get,
                path: "/organizations/{organizationId}/devices",
                params: &[P::required("organizationId"), P::optional("perPage")],
            },
            EndpointSpec {
                name: "getOrganizationNetworks",
                verb: Get,
                path: "/organizations/{organizationId}/networks",
                params: &[P::required("organizationId"), P::optional("perPage")],
            },
            EndpointSpec {
                name: "getOrganizationInventoryDevices",
                verb: Get,
                path: "/organizations/{organizationId}/inventory/devices",
                params: &[P::required("organizationId"), P::optional("perPage")],
            },
            EndpointSpec {
                name: "getOrganizationUplinksStatuses",
                verb: Get,
                path: "/organizations/{organizationId}/uplinks/statuses",
                params: &[P::required("organizationId"), P::optional("perPage")],
            },
            EndpointSpec {
                name: "getOrganizationApiRequests",
                verb: Get,
                path: "/organizations/{organizationId}/apiRequests",
                params: &[
                    P::required("organizationId"),
                    P::with_default("timespan", Int(86_400)),
                    P::optional("perPage"),
                ],
            },
            EndpointSpec {
                name: "claimIntoOrganizationInventory",
                verb: Post,
                path: "/organizations/{organizationId}/inventory/claim",
                params: &[P::required("organizationId"), P::optional("serials")],
            },
            EndpointSpec {
                name: "enableOrganizationIntegrationsXdrNetworks",
                verb: Post,
                path: "/organizations/{organizationId}/integrations/xdr/networks/enable",
                params: &[P::required("organizationId"), P::required("networks")],
            },
            EndpointSpec {
                name: "disableOrganizationIntegrationsXdrNetworks",
                verb: Post,
                path: "/organizations/{organizationId}/integrations/xdr/networks/disable",
                params: &[P::required("organizationId"), P::required("networks")],
            },
        ],
    },
    SectionSpec {
        name: "networks",
        endpoints: &[
            EndpointSpec {
                name: "getNetwork",
                verb: Get,
                path: "/networks/{networkId}",
                params: &[P::required("networkId")],
            },
            EndpointSpec {
                name: "getNetworkClients",
                verb: Get,
                path: "/networks/{networkId}/clients",
                params: &[
                    P::required("networkId"),
                    P::with_default("timespan", Int(86_400)),
                    P::optional("perPage"),
                ],
            },
            EndpointSpec {
                name: "getNetworkEvents",
                verb: Get,
                path: "/networks/{networkId}/events",
                params: &[
                    P::required("networkId"),
                    P::optional("productType"),
                    P::optional("perPage"),
                ],
            },
            EndpointSpec {
                name: "getNetworkSettings",
                verb: Get,
                path: "/networks/{networkId}/settings",
                params: &[P::required("networkId")],
            },
            EndpointSpec {
                name: "getNetworkTopologyLinkLayer",
                verb: Get,
                path: "/networks/{networkId}/topology/linkLayer",
                params: &[P::required("networkId")],
            },
            EndpointSpec {
                name: "updateNetwork",
                verb: Put,
                path: "/networks/{networkId}",
                params: &[
                    P::required("networkId"),
                    P::optional("name"),
                    P::optional("timeZone"),
                    P::optional("notes"),
                ],
            },
            EndpointSpec {
                name: "deleteNetwork",
                verb: Delete,
                path: "/networks/{networkId}",
                params: &[P::required("networkId")],
            },
            EndpointSpec {
                name: "removeNetworkDevices",
                verb: Post,
                path: "/networks/{networkId}/devices/remove",
                params: &[P::required("networkId"), P::required("serial")],
            },
            EndpointSpec {
                name: "bindNetwork",
                verb: Post,
                path: "/networks/{networkId}/bind",
                params: &[
                    P::required("networkId"),
                    P::required("configTemplateId"),
                    P::optional("autoBind"),
                ],
            },
            EndpointSpec {
                name: "splitNetwork",
                verb: Post,
                path: "/networks/{networkId}/split",
                params: &[P::required("networkId")],
            },
        ],
    },
    SectionSpec {
        name: "devices",
        endpoints: &[
            EndpointSpec {
                name: "getDevice",
                verb: Get,
                path: "/devices/{serial}",
                params: &[P::required("serial")],
            },
            EndpointSpec {
                name: "getDeviceClients",
                verb: Get,
                path: "/devices/{serial}/clients",
                params: &[P::required("serial"), P::with_default("timespan", Int(86_400))],
            },
            EndpointSpec {
                name: "getDeviceManagementInterface",
                verb: Get,
                path: "/devices/{serial}/managementInterface",
                params: &[P::required("serial")],
            },
            EndpointSpec {
                name: "updateDevice",
                verb: Put,
                path: "/devices/{serial}",
                params: &[
                    P::required("serial"),
                    P::optional("name"),
                    P::optional("tags"),
                    P::optional("address"),
                ],
            },
            EndpointSpec {
                name: "rebootDevice",
                verb: Post,
                path: "/devices/{serial}/reboot",
                params: &[P::required("serial")],
            },
            EndpointSpec {
                name: "blinkDeviceLeds",
                verb: Post,
                path: "/devices/{serial}/blinkLeds",
                params: &[
                    P::required("serial"),
                    P::with_default("duration", Int(20)),
                    P::with_default("period", Int(160)),
                    P::with_default("duty", Int(50)),
                ],
            },
        ],
    },
    SectionSpec {
        name: "switch",
        endpoints: &[
            EndpointSpec {
                name: "getDeviceSwitchPorts",
                verb: Get,
                path: "/devices/{serial}/switch/ports",
                params: &[P::required("serial")],
            },
            EndpointSpec {
                name: "getDeviceSwitchPort",
                verb: Get,
                path: "/devices/{serial}/switch/ports/{portId}",
                params: &[P::required("serial"), P::required("portId")],
            },
            EndpointSpec {
                name: "updateDeviceSwitchPort",
                verb: Put,
                path: "/devices/{serial}/switch/ports/{portId}",
                params: &[
                    P::required("serial"),
                    P::required("portId"),
                    P::optional("name"),
                    P::optional("enabled"),
                    P::optional("vlan"),
                ],
            },
            EndpointSpec {
                name: "cycleDeviceSwitchPorts",
                verb: Post,
                path: "/devices/{serial}/switch/ports/cycle",
                params: &[P::required("serial"), P::required("ports")],
            },
        ],
    },
    SectionSpec {
        name: "wireless",
        endpoints: &[
            EndpointSpec {
                name: "getNetworkWirelessSsids",
                verb: Get,
                path: "/networks/{networkId}/wireless/ssids",
                params: &[P::required("networkId")],
            },
            EndpointSpec {
                name: "getNetworkWirelessSsid",
                verb: Get,
                path: "/networks/{networkId}/wireless/ssids/{number}",
                params: &[P::required("networkId"), P::required("number")],
            },
            EndpointSpec {
                name: "updateNetworkWirelessSsid",
                verb: Put,
                path: "/networks/{networkId}/wireless/ssids/{number}",
                params: &[
                    P::required("networkId"),
                    P::required("number"),
                    P::optional("name"),
                    P::optional("enabled"),
                    P::optional("psk"),
                ],
            },
            EndpointSpec {
                name: "updateNetworkWirelessLocationScanning",
                verb: Put,
                path: "/networks/{networkId}/wireless/location/scanning",
                params: &[
                    P::required("networkId"),
                    P::optional("analyticsEnabled"),
                    P::optional("scanningApiEnabled"),
                ],
            },
            EndpointSpec {
                name: "updateNetworkWirelessSsidFirewallL7FirewallRules",
                verb: Put,
                path: "/networks/{networkId}/wireless/ssids/{number}/firewall/l7FirewallRules",
                params: &[
                    P::required("networkId"),
                    P::required("number"),
                    P::required("rules"),
                ],
            },
        ],
    },
    SectionSpec {
        name: "appliance",
        endpoints: &[
            EndpointSpec {
                name: "getNetworkApplianceFirewallL3FirewallRules",
                verb: Get,
                path: "/networks/{networkId}/appliance/firewall/l3FirewallRules",
                params: &[P::required("networkId")],
            },
            EndpointSpec {
                name: "updateNetworkApplianceFirewallL3FirewallRules",
                verb: Put,
                path: "/networks/{networkId}/appliance/firewall/l3FirewallRules",
                params: &[
                    P::required("networkId"),
                    P::required("rules"),
                    P::optional("syslogDefaultRule"),
                ],
            },
            EndpointSpec {
                name: "getNetworkApplianceVlans",
                verb: Get,
                path: "/networks/{networkId}/appliance/vlans",
                params: &[P::required("networkId")],
            },
            EndpointSpec {
                name: "getNetworkApplianceSettings",
                verb: Get,
                path: "/networks/{networkId}/appliance/settings",
                params: &[P::required("networkId")],
            },
        ],
    },
    SectionSpec {
        name: "administered",
        endpoints: &[
            EndpointSpec {
                name: "getAdministeredIdentitiesMe",
                verb: Get,
                path: "/administered/identities/me",
                params: &[],
            },
            EndpointSpec {
                name: "getAdministeredIdentitiesMeApiKeys",
                verb: Get,
                path: "/administered/identities/me/api/keys",
                params: &[],
            },
            EndpointSpec {
                name: "generateAdministeredIdentitiesMeApiKeys",
                verb: Post,
                path: "/administered/identities/me/api/keys/generate",
                params: &[],
            },
            EndpointSpec {
                name: "revokeAdministeredIdentitiesMeApiKeys",
                verb: Post,
                path: "/administered/identities/me/api/keys/{suffix}/revoke",
                params: &[P::required("suffix")],
            },
        ],
    },
    SectionSpec {
        name: "sensor",
        endpoints: &[
            EndpointSpec {
                name: "getOrganizationSensorReadingsLatest",
                verb: Get,
                path: "/organizations/{organizationId}/sensor/readings/latest",
                params: &[P::required("organizationId"), P::optional("perPage")],
            },
            EndpointSpec {
                name: "getOrganizationSensorGatewaysConnectionsLatest",
                verb: Get,
                path: "/organizations/{organizationId}/sensor/gateways/connections/latest",
                params: &[P::required("organizationId"), P::optional("perPage")],
            },
        ],
    },
];
