//! Node and pool aggregation
//!
//! Builds the pool pages: every node is decorated with a histogram of its
//! units by status and a UTC-normalized `LastSuccess`, then grouped by the
//! pool recorded in its metadata.

use futures::{stream, StreamExt, TryStreamExt};
use reqwest::Url;
use tracing::{debug, warn};

use crate::models::{
    Container, Node, NodeDetail, NodeView, PoolMap, UnitHistogram, LAST_SUCCESS_METADATA_KEY,
};
use crate::services::tsuru::{SessionToken, TsuruClient, TsuruError};
use crate::utils::time::normalize_timestamp;

/// Upper bound on container listings in flight for one page
pub const MAX_CONCURRENT_NODE_FETCHES: usize = 16;

/// Reduce a node address (`http://host:2375`) to the bare hostname used by
/// the per-node endpoints.
pub fn node_host(address: &str) -> String {
    if let Ok(url) = Url::parse(address) {
        if let Some(host) = url.host_str() {
            return host.to_string();
        }
    }

    let rest = address
        .strip_prefix("http://")
        .or_else(|| address.strip_prefix("https://"))
        .unwrap_or(address);
    rest.split([':', '/']).next().unwrap_or(rest).to_string()
}

/// Count containers by status
pub fn unit_histogram(containers: &[Container]) -> UnitHistogram {
    let mut histogram = UnitHistogram::new();
    for container in containers {
        *histogram.entry(container.status.clone()).or_insert(0) += 1;
    }
    histogram
}

/// Project an upstream node into its page representation
pub fn node_view(node: Node, units: UnitHistogram) -> NodeView {
    let Node {
        address,
        mut metadata,
        extra,
    } = node;

    let last_success = metadata
        .remove(LAST_SUCCESS_METADATA_KEY)
        .and_then(|raw| {
            let parsed = normalize_timestamp(&raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                warn!(address = %address, value = %raw, "Unparseable LastSuccess on node");
            }
            parsed
        });

    NodeView {
        address,
        metadata,
        last_success,
        units,
        extra,
    }
}

/// Group nodes by pool name, keeping upstream order inside each pool
pub fn group_by_pool(nodes: Vec<NodeView>) -> PoolMap {
    let mut pools = PoolMap::new();
    for node in nodes {
        pools.entry(node.pool().to_string()).or_default().push(node);
    }
    pools
}

/// All nodes grouped by pool
pub async fn list_pools(client: &TsuruClient, token: &SessionToken) -> Result<PoolMap, TsuruError> {
    aggregate(client, token, None).await
}

/// Nodes of a single pool; the map holds at most that one key
pub async fn pool_detail(
    client: &TsuruClient,
    token: &SessionToken,
    pool: &str,
) -> Result<PoolMap, TsuruError> {
    aggregate(client, token, Some(pool)).await
}

/// Node lookup plus the containers running on it
pub async fn node_detail(
    client: &TsuruClient,
    token: &SessionToken,
    address: &str,
) -> Result<NodeDetail, TsuruError> {
    let containers = client
        .list_node_containers(token, &node_host(address))
        .await?;
    let node = client
        .list_nodes(token)
        .await?
        .into_iter()
        .find(|n| n.address == address)
        .map(|n| node_view(n, unit_histogram(&containers)));

    Ok(NodeDetail {
        address: address.to_string(),
        node,
        containers,
    })
}

async fn aggregate(
    client: &TsuruClient,
    token: &SessionToken,
    pool: Option<&str>,
) -> Result<PoolMap, TsuruError> {
    let nodes: Vec<Node> = client
        .list_nodes(token)
        .await?
        .into_iter()
        .filter(|node| pool.is_none_or(|p| node.pool() == p))
        .collect();

    debug!(count = nodes.len(), pool = ?pool, "Collecting units for nodes");

    let views: Vec<NodeView> = stream::iter(nodes)
        .map(|node| async move {
            let containers = client
                .list_node_containers(token, &node_host(&node.address))
                .await?;
            Ok::<_, TsuruError>(node_view(node, unit_histogram(&containers)))
        })
        .buffered(MAX_CONCURRENT_NODE_FETCHES)
        .try_collect()
        .await?;

    Ok(group_by_pool(views))
}
