//! Request shapes for every resource kind on the platform.
//!
//! The platform mixes two API generations: the `/api/v2` REST resources and
//! the older `/box/srv/1.1` action endpoints that take their arguments in a
//! JSON body. Both are described here as data so the client stays generic.

use reqwest::Method;

use crate::prune::catalogue::Kind;

/// How to fetch a kind's collection and read each item
#[derive(Debug, Clone)]
pub struct ListEndpoint {
    pub method: Method,
    pub path: &'static str,
    /// JSON pointer to the array inside the response, `None` for a bare array
    pub collection: Option<&'static str>,
    /// JSON pointer to the display name within an item ("" for the item itself)
    pub name: &'static str,
    /// JSON pointer to the identifier used for deletion
    pub id: &'static str,
}

/// How to delete one item
#[derive(Debug, Clone)]
pub enum DeleteEndpoint {
    /// `<method> <collection>/<id>`
    Resource { method: Method, collection: &'static str },
    /// `POST <path>` with `{ "<field>": id }`
    Action { path: &'static str, field: &'static str },
}

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub list: ListEndpoint,
    pub delete: DeleteEndpoint,
    /// Send the run's auth token along with the delete call
    pub sends_token: bool,
    /// Items are bare guids whose names live in the store item listing
    pub resolve_store_item_names: bool,
}

/// Current user lookup
pub const USER_READ_PATH: &str = "/box/srv/1.1/user/read";
pub const USER_NAME_POINTERS: &[&str] = &["/fields/username", "/username"];

fn rest(path: &'static str, name: &'static str, id: &'static str) -> Endpoint {
    Endpoint {
        list: ListEndpoint {
            method: Method::GET,
            path,
            collection: None,
            name,
            id,
        },
        delete: DeleteEndpoint::Resource {
            method: Method::DELETE,
            collection: path,
        },
        sends_token: false,
        resolve_store_item_names: false,
    }
}

fn action(
    list_path: &'static str,
    delete_path: &'static str,
    field: &'static str,
    name: &'static str,
    id: &'static str,
) -> Endpoint {
    Endpoint {
        list: ListEndpoint {
            method: Method::POST,
            path: list_path,
            collection: Some("/list"),
            name,
            id,
        },
        delete: DeleteEndpoint::Action {
            path: delete_path,
            field,
        },
        sends_token: false,
        resolve_store_item_names: false,
    }
}

pub fn endpoint(kind: Kind) -> Endpoint {
    match kind {
        Kind::Projects => Endpoint {
            list: ListEndpoint {
                path: "/box/api/projects?apps=false",
                ..rest("/box/api/projects", "/title", "/guid").list
            },
            ..rest("/box/api/projects", "/title", "/guid")
        },
        Kind::Teams => rest("/api/v2/admin/teams", "/name", "/_id"),
        Kind::Forms => rest("/api/v2/forms", "/name", "/_id"),
        Kind::AuthPolicies => action(
            "/box/srv/1.1/admin/authpolicy/list",
            "/box/srv/1.1/admin/authpolicy/delete",
            "guid",
            "/policyId",
            "/guid",
        ),
        Kind::StoreItems => action(
            "/box/srv/1.1/admin/storeitem/list",
            "/box/srv/1.1/admin/storeitem/delete",
            "guid",
            "/name",
            "/guid",
        ),
        Kind::StoreItemGroups => action(
            "/box/srv/1.1/admin/storeitemgroup/list",
            "/box/srv/1.1/admin/storeitemgroup/delete",
            "guid",
            "/name",
            "/guid",
        ),
        // Keys are addressed by name
        Kind::SshKeys => action(
            "/box/srv/1.1/ide/keys/ssh/list",
            "/box/srv/1.1/ide/keys/ssh/delete",
            "name",
            "/name",
            "/name",
        ),
        // Users are deleted by username, not guid
        Kind::Users => action(
            "/box/srv/1.1/admin/user/list",
            "/box/srv/1.1/admin/user/delete",
            "username",
            "/fields/username",
            "/fields/username",
        ),
        Kind::DataSources => rest("/api/v2/appforms/data_sources", "/name", "/_id"),
        Kind::Themes => rest("/api/v2/appforms/themes", "/name", "/_id"),
        Kind::Environments => Endpoint {
            sends_token: true,
            ..rest("/api/v2/environments", "/id", "/id")
        },
        Kind::AppStoreItems => Endpoint {
            list: ListEndpoint {
                method: Method::POST,
                path: "/box/srv/1.1/admin/appstore/read",
                collection: Some("/storeitems"),
                name: "",
                id: "",
            },
            delete: DeleteEndpoint::Action {
                path: "/box/srv/1.1/admin/appstore/removeitem",
                field: "guid",
            },
            sends_token: false,
            resolve_store_item_names: true,
        },
        Kind::Services => rest("/box/api/services", "/title", "/guid"),
        Kind::Mbaas => rest("/api/v2/mbaases", "/id", "/id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projects_list_excludes_apps() {
        let ep = endpoint(Kind::Projects);
        assert_eq!(ep.list.path, "/box/api/projects?apps=false");
        assert!(matches!(
            ep.delete,
            DeleteEndpoint::Resource { collection: "/box/api/projects", .. }
        ));
    }

    #[test]
    fn test_only_environments_send_token() {
        let with_token: Vec<Kind> = Kind::ALL
            .into_iter()
            .filter(|k| endpoint(*k).sends_token)
            .collect();
        assert_eq!(with_token, vec![Kind::Environments]);
    }

    #[test]
    fn test_users_deleted_by_username() {
        let ep = endpoint(Kind::Users);
        assert_eq!(ep.list.id, "/fields/username");
        assert!(matches!(ep.delete, DeleteEndpoint::Action { field: "username", .. }));
    }
}
