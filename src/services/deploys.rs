//! Deploy listing, charting and detail rendering

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

use crate::config::DeployLimitMode;
use crate::models::{ChartPoint, ChartSeries, Deploy, DeployPage};
use crate::services::diff;
use crate::services::tsuru::{SessionToken, TsuruClient, TsuruError};
use crate::utils::error::AppResult;
use crate::utils::validation::{parse_optional_int, parse_optional_regex};

/// Deploys shown per page
pub const PAGE_SIZE: u32 = 20;

/// Diff text the orchestrator stores when a deploy has a single commit
pub const NO_DIFF_SENTINEL: &str = "The deployment must have at least two commits for the diff.";

const NANOS_PER_MINUTE: f64 = 60.0 * 1_000_000_000.0;

/// The `skip`/`limit` pair sent upstream for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u32,
    pub limit: u32,
}

impl PageWindow {
    pub fn for_page(page: u32, mode: DeployLimitMode) -> Self {
        let page = page.max(1);
        let skip = (page - 1).saturating_mul(PAGE_SIZE);
        let limit = match mode {
            DeployLimitMode::Cumulative => page.saturating_mul(PAGE_SIZE),
            DeployLimitMode::Window => PAGE_SIZE,
        };
        Self { skip, limit }
    }
}

/// Wrap a fetched page with its navigation links.
///
/// `next` is offered whenever the page came back full, even if nothing
/// follows it upstream. The last representable page has no `next`.
pub fn paginate(deploys: Vec<Deploy>, page: u32) -> DeployPage {
    let next = if deploys.len() >= PAGE_SIZE as usize {
        page.checked_add(1)
    } else {
        None
    };
    let previous = (page > 1).then(|| page - 1);
    DeployPage {
        deploys,
        page,
        next,
        previous,
    }
}

/// Fetch one page of deploys
pub async fn list_deploys(
    client: &TsuruClient,
    token: &SessionToken,
    page: u32,
    mode: DeployLimitMode,
) -> Result<DeployPage, TsuruError> {
    let window = PageWindow::for_page(page, mode);
    debug!(page, skip = window.skip, limit = window.limit, "Listing deploys");
    let deploys = client.list_deploys(token, window.skip, window.limit).await?;
    Ok(paginate(deploys, page))
}

/// Filters of the deploy duration chart
#[derive(Debug, Clone, Default)]
pub struct ChartFilter {
    pub include: Option<Regex>,
    pub exclude: Option<Regex>,
    pub min_minutes: Option<i64>,
    pub max_minutes: Option<i64>,
}

impl ChartFilter {
    /// Build a filter from raw query values; blank values are ignored
    pub fn from_params(
        app: Option<&str>,
        app_exclude: Option<&str>,
        min_time: Option<&str>,
        max_time: Option<&str>,
    ) -> AppResult<Self> {
        Ok(Self {
            include: parse_optional_regex("app", app)?,
            exclude: parse_optional_regex("appExclude", app_exclude)?,
            min_minutes: parse_optional_int("minTime", min_time)?,
            max_minutes: parse_optional_int("maxTime", max_time)?,
        })
    }

    fn accepts_app(&self, app: &str) -> bool {
        self.include.as_ref().is_none_or(|re| re.is_match(app))
            && !self.exclude.as_ref().is_some_and(|re| re.is_match(app))
    }

    fn accepts_minutes(&self, minutes: f64) -> bool {
        self.min_minutes.is_none_or(|min| minutes >= min as f64)
            && self.max_minutes.is_none_or(|max| minutes <= max as f64)
    }
}

/// Group finished deploys into per-app duration series, oldest first.
///
/// Series appear in the order their app is first seen.
pub fn build_chart(deploys: &[Deploy], filter: &ChartFilter) -> Vec<ChartSeries> {
    let mut series: Vec<ChartSeries> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for deploy in deploys.iter().rev() {
        if deploy.duration == 0 || !filter.accepts_app(&deploy.app) {
            continue;
        }

        let minutes = deploy.duration as f64 / NANOS_PER_MINUTE;
        if !filter.accepts_minutes(minutes) {
            continue;
        }

        let slot = *index.entry(deploy.app.as_str()).or_insert_with(|| {
            series.push(ChartSeries {
                key: deploy.app.clone(),
                values: Vec::new(),
            });
            series.len() - 1
        });
        series[slot].values.push(ChartPoint {
            x: deploy.timestamp.clone(),
            y: minutes,
        });
    }

    series
}

/// Fetch every deploy and chart the ones the filter keeps
pub async fn deploy_chart(
    client: &TsuruClient,
    token: &SessionToken,
    filter: &ChartFilter,
) -> Result<Vec<ChartSeries>, TsuruError> {
    let deploys = client.list_all_deploys(token).await?;
    Ok(build_chart(&deploys, filter))
}

/// Replace the raw diff with its highlighted HTML; no diff becomes `None`
pub fn render_diff(deploy: &mut Deploy) {
    deploy.diff = match deploy.diff.take() {
        Some(raw) if !raw.is_empty() && raw != NO_DIFF_SENTINEL => Some(diff::highlight(&raw)),
        _ => None,
    };
}

/// Fetch a deploy with a rendered diff; `None` when it does not exist
pub async fn deploy_detail(
    client: &TsuruClient,
    token: &SessionToken,
    id: &str,
) -> Result<Option<Deploy>, TsuruError> {
    let mut deploy = client.get_deploy(token, id).await?;
    if let Some(deploy) = deploy.as_mut() {
        render_diff(deploy);
    }
    Ok(deploy)
}
