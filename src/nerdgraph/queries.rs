//! Fixed NerdGraph query documents.
//!
//! Each query takes `$accountId` and `$cursor` and resolves to a container
//! holding a batch (`policies` or `entities`), `nextCursor` and `totalCount`.

/// A cursor-paginated query and the path from `data` to its page container.
#[derive(Debug, Clone, Copy)]
pub struct PagedQuery {
    pub name: &'static str,
    pub document: &'static str,
    pub container_path: &'static [&'static str],
}

pub const POLICIES: PagedQuery = PagedQuery {
    name: "Policies",
    document: r#"
query Policies($accountId: Int!, $cursor: String) {
  actor {
    account(id: $accountId) {
      alerts {
        policiesSearch(cursor: $cursor) {
          policies {
            id
            name
            incidentPreference
          }
          nextCursor
          totalCount
        }
      }
    }
  }
}
"#,
    container_path: &["actor", "account", "alerts", "policiesSearch"],
};

pub const WORKFLOWS: PagedQuery = PagedQuery {
    name: "Workflows",
    document: r#"
query Workflows($accountId: Int!, $cursor: String) {
  actor {
    account(id: $accountId) {
      aiWorkflows {
        workflows(filters: {}, cursor: $cursor) {
          entities {
            id
            name
            issuesFilter {
              name
              type
              predicates {
                attribute
                operator
                values
              }
            }
            destinationConfigurations {
              channelId
              name
              type
              notificationTriggers
            }
          }
          nextCursor
          totalCount
        }
      }
    }
  }
}
"#,
    container_path: &["actor", "account", "aiWorkflows", "workflows"],
};

pub const EMAIL_CHANNELS: PagedQuery = PagedQuery {
    name: "EmailChannels",
    document: r#"
query EmailChannels($accountId: Int!, $cursor: String) {
  actor {
    account(id: $accountId) {
      aiNotifications {
        channels(filters: { type: EMAIL }, cursor: $cursor) {
          entities {
            id
            name
            destinationId
            properties {
              key
              value
            }
          }
          nextCursor
          totalCount
          error { details }
        }
      }
    }
  }
}
"#,
    container_path: &["actor", "account", "aiNotifications", "channels"],
};

pub const EMAIL_DESTINATIONS: PagedQuery = PagedQuery {
    name: "EmailDestinations",
    document: r#"
query EmailDestinations($accountId: Int!, $cursor: String) {
  actor {
    account(id: $accountId) {
      aiNotifications {
        destinations(filters: { type: EMAIL }, cursor: $cursor) {
          entities {
            id
            name
            type
            properties {
              key
              value
              displayValue
              label
            }
          }
          nextCursor
          totalCount
          error { details }
        }
      }
    }
  }
}
"#,
    container_path: &["actor", "account", "aiNotifications", "destinations"],
};
