use std::collections::VecDeque;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use reddio::core::listing::{
    Identity, ListingController, NetworkStatus, Page, PageFetcher, PageInfo, Presentation,
};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Post(&'static str);

impl Identity for Post {
    fn identity(&self) -> &str {
        self.0
    }
}

/// Hands out the queued pages in order and records the cursors it was given.
struct Pages {
    queue: Mutex<VecDeque<anyhow::Result<Page<Post>>>>,
    cursors: Mutex<Vec<Option<String>>>,
}

impl Pages {
    fn new(pages: Vec<anyhow::Result<Page<Post>>>) -> Self {
        Self { queue: Mutex::new(pages.into()), cursors: Mutex::new(Vec::new()) }
    }
}

#[async_trait::async_trait]
impl PageFetcher<Post> for Pages {
    async fn fetch(&self, after: Option<String>) -> anyhow::Result<Page<Post>> {
        self.cursors.lock().unwrap().push(after);
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no more pages")))
    }
}

fn page(posts: Vec<&'static str>, cursor: Option<&str>) -> Page<Post> {
    Page::new(
        posts.into_iter().map(Post).collect(),
        PageInfo {
            has_next_page: cursor.is_some(),
            next_cursor: cursor.map(str::to_string),
        },
    )
}

#[tokio::test]
async fn test_scrolling_a_listing_to_the_end() {
    let listing = ListingController::new(Pages::new(vec![
        Ok(page(vec!["t3_a", "t3_b"], Some("t3_b"))),
        Ok(page(vec!["t3_b", "t3_c"], Some("t3_c"))),
        Ok(page(vec!["t3_d"], None)),
    ]));

    assert!(matches!(listing.presentation(), Presentation::Loading));
    assert!(listing.load().await.unwrap());
    while listing.load_next_page().await.unwrap() {}

    let view = listing.view();
    assert_eq!(
        view.items,
        vec![Post("t3_a"), Post("t3_b"), Post("t3_c"), Post("t3_d")]
    );
    assert_eq!(listing.status(), NetworkStatus::Idle);
    assert_eq!(view.page_info.map(|info| info.has_next_page), Some(false));
}

#[tokio::test]
async fn test_failed_page_is_retried_with_the_same_cursor() {
    let listing = ListingController::new(Pages::new(vec![
        Ok(page(vec!["t3_a"], Some("t3_a"))),
        Err(anyhow::anyhow!("503 Service Unavailable")),
        Ok(page(vec!["t3_b"], None)),
    ]));

    listing.load().await.unwrap();
    assert!(listing.load_next_page().await.is_err());
    assert_eq!(listing.view().items, vec![Post("t3_a")]);

    assert!(listing.load_next_page().await.unwrap());
    assert_eq!(listing.view().items, vec![Post("t3_a"), Post("t3_b")]);
}
