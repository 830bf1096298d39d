//! City page commands: one-shot `explore` and interactive `browse`.

use std::sync::Arc;

use cityscout_core::Category;
use cityscout_places::{load_city_page, CityNavigator, CityPage, PlacesFacade};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use crate::lookup::truncate;
use crate::print_json;

pub(crate) async fn run_explore(
    facade: &PlacesFacade,
    city: &str,
    category: &Category,
    detail_concurrency: usize,
    json: bool,
) -> anyhow::Result<()> {
    let page = load_city_page(facade, city, category, detail_concurrency).await?;
    if json {
        return print_json(&page);
    }
    print_page(&page);
    Ok(())
}

/// Reads one city per stdin line and navigates to it without waiting for the
/// previous navigation. Only pages that are still current when they finish
/// are printed.
pub(crate) async fn run_browse(
    facade: Arc<PlacesFacade>,
    category: Category,
    detail_concurrency: usize,
    json: bool,
) -> anyhow::Result<()> {
    let navigator = Arc::new(CityNavigator::new(facade, detail_concurrency));
    let category = Arc::new(category);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        let city = line.trim().to_string();
        if city.is_empty() {
            continue;
        }
        let navigator = Arc::clone(&navigator);
        let category = Arc::clone(&category);
        tasks.spawn(async move {
            match navigator.navigate(&city, &category).await {
                Ok(Some(page)) => {
                    if json {
                        if let Err(e) = print_json(&page) {
                            tracing::error!(city = %city, error = %e, "failed to print city page");
                        }
                    } else {
                        print_page(&page);
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::error!(city = %city, error = %e, "navigation failed"),
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "navigation task panicked");
        }
    }
    Ok(())
}

fn print_page(page: &CityPage) {
    println!(
        "{} ({}): {} {}",
        page.city,
        page.center,
        page.places.len(),
        page.category
    );
    for (i, card) in page.places.iter().enumerate() {
        let website = card
            .detail
            .as_ref()
            .and_then(|d| d.website.as_deref())
            .unwrap_or("-");
        println!(
            "{:>3}. {:<36}{:<6.1}{}",
            i + 1,
            truncate(&card.summary.name, 34),
            card.summary.rating,
            website
        );
        if let Some(url) = &card.photo_url {
            println!("     photo: {url}");
        }
    }
}
