//! Integration tests for operator and public catalog listings.

mod helpers;

use gemhub_core::error::ErrorKind;
use gemhub_database::repositories::ProductRepository;
use gemhub_entity::product::{AvailabilityStatus, ModerationStatus, Treatment, TreatmentType};
use gemhub_service::{OperatorListParams, PublicListParams};

use helpers::{TestApp, admin, buyer, image, ruby_request, superadmin};

#[tokio::test]
async fn test_public_listing_excludes_pending() {
    let app = TestApp::new();
    let approved = app.create_product(&superadmin(), "Approved Oval").await;
    let pending = app.create_product(&admin(), "Pending Oval").await;
    assert_eq!(pending.moderation.status, ModerationStatus::Pending);

    let page = app
        .catalog
        .list_public(&PublicListParams::default())
        .await
        .unwrap();

    assert_eq!(page.total_items, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, approved.id);
}

#[tokio::test]
async fn test_public_listing_hides_sold_products() {
    let app = TestApp::new();
    let top = superadmin();
    let product = app.create_product(&top, "Sold Cushion").await;
    app.product_service
        .set_availability(&top, product.id, AvailabilityStatus::Sold)
        .await
        .unwrap();

    let page = app
        .catalog
        .list_public(&PublicListParams::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_operator_listing_is_scoped_to_own_products() {
    let app = TestApp::new();
    let alice = admin();
    let bob = admin();
    let mine = app.create_product(&alice, "Alice Ruby").await;
    app.create_product(&bob, "Bob Ruby").await;

    let page = app
        .catalog
        .list_operator(&alice, &OperatorListParams::default())
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].id, mine.id);

    let everything = app
        .catalog
        .list_operator(&superadmin(), &OperatorListParams::default())
        .await
        .unwrap();
    assert_eq!(everything.total_items, 2);
}

#[tokio::test]
async fn test_ownership_scope_cannot_be_widened_by_filters() {
    let app = TestApp::new();
    let alice = admin();
    let bob = admin();
    let bobs = app.create_product(&bob, "Bob Only").await;

    let params = OperatorListParams {
        category: Some(bobs.category_id),
        search: Some("Bob".into()),
        ..OperatorListParams::default()
    };
    let page = app.catalog.list_operator(&alice, &params).await.unwrap();
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn test_buyer_cannot_use_operator_listing() {
    let app = TestApp::new();
    let err = app
        .catalog
        .list_operator(&buyer(), &OperatorListParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_search_spans_name_sku_and_tags() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Search Stones").await;

    let mut tagged = ruby_request("Plain Stone", category.category.id);
    tagged.tags = vec!["Mogok".into()];
    let tagged = app.product_service.create(&top, tagged).await.unwrap();

    let mut described = ruby_request("Other Stone", category.category.id);
    described.short_description = Some("Glowing mogok red".into());
    let described = app.product_service.create(&top, described).await.unwrap();

    let unrelated = app
        .product_service
        .create(&top, ruby_request("Third Stone", category.category.id))
        .await
        .unwrap();

    let search = |term: &str| OperatorListParams {
        search: Some(term.to_string()),
        ..OperatorListParams::default()
    };

    let page = app.catalog.list_operator(&top, &search("MOGOK")).await.unwrap();
    let mut ids: Vec<_> = page.items.iter().map(|p| p.id).collect();
    ids.sort_by_key(|id| id.into_uuid());
    let mut expected = vec![tagged.id, described.id];
    expected.sort_by_key(|id| id.into_uuid());
    assert_eq!(ids, expected);

    let sku_fragment = unrelated.sku.to_lowercase();
    let page = app
        .catalog
        .list_operator(&top, &search(&sku_fragment))
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].id, unrelated.id);
}

#[tokio::test]
async fn test_unheated_filter() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Treatment").await;

    let mut natural = ruby_request("Natural Red", category.category.id);
    natural.treatment = Some(Treatment {
        heated: false,
        treatment_type: TreatmentType::None,
        description: None,
    });
    let natural = app.product_service.create(&top, natural).await.unwrap();
    assert!(natural.features.unheated);
    app.product_service
        .create(&top, ruby_request("Heated Red", category.category.id))
        .await
        .unwrap();

    let params = OperatorListParams {
        unheated: Some(true),
        ..OperatorListParams::default()
    };
    let page = app.catalog.list_operator(&top, &params).await.unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].id, natural.id);

    let params = OperatorListParams {
        unheated: Some(false),
        ..OperatorListParams::default()
    };
    let page = app.catalog.list_operator(&top, &params).await.unwrap();
    assert_eq!(page.total_items, 2);
}

#[tokio::test]
async fn test_public_listing_puts_featured_first() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Featured").await;

    let mut featured = ruby_request("Star Piece", category.category.id);
    featured.featured = true;
    let featured = app.product_service.create(&top, featured).await.unwrap();
    app.product_service
        .create(&top, ruby_request("Newer Piece", category.category.id))
        .await
        .unwrap();

    let page = app
        .catalog
        .list_public(&PublicListParams::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, featured.id);
}

#[tokio::test]
async fn test_operator_listing_is_newest_first() {
    let app = TestApp::new();
    let top = superadmin();
    let first = app.create_product(&top, "First Listed").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = app.create_product(&top, "Second Listed").await;

    let page = app
        .catalog
        .list_operator(&top, &OperatorListParams::default())
        .await
        .unwrap();
    assert_eq!(page.items[0].id, second.id);
    assert_eq!(page.items[1].id, first.id);
}

#[tokio::test]
async fn test_pagination_counts_the_full_predicate() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Bulk").await;
    for i in 0..15 {
        app.product_service
            .create(&top, ruby_request(&format!("Bulk Ruby {i}"), category.category.id))
            .await
            .unwrap();
    }

    let first = app
        .catalog
        .list_public(&PublicListParams::default())
        .await
        .unwrap();
    assert_eq!(first.page_size, 12);
    assert_eq!(first.items.len(), 12);
    assert_eq!(first.total_items, 15);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next);

    let second = app
        .catalog
        .list_public(&PublicListParams {
            page: Some(2),
            ..PublicListParams::default()
        })
        .await
        .unwrap();
    assert_eq!(second.items.len(), 3);
    assert!(!second.has_next);

    let operator = app
        .catalog
        .list_operator(&top, &OperatorListParams::default())
        .await
        .unwrap();
    assert_eq!(operator.page_size, 20);
    assert_eq!(operator.items.len(), 15);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Sparse").await;
    for i in 0..3 {
        app.product_service
            .create(&top, ruby_request(&format!("Sparse Ruby {i}"), category.category.id))
            .await
            .unwrap();
    }

    let page = app
        .catalog
        .list_public(&PublicListParams {
            page: Some(u64::MAX),
            ..PublicListParams::default()
        })
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 1);
    assert!(!page.has_next);

    let page = app
        .catalog
        .list_operator(
            &top,
            &OperatorListParams {
                page: Some(u64::MAX),
                page_size: Some(100),
                ..OperatorListParams::default()
            },
        )
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 3);
}

#[tokio::test]
async fn test_public_listing_by_category_slug() {
    let app = TestApp::new();
    let top = superadmin();
    let product = app.create_product(&top, "Slug Filtered").await;
    app.create_product(&top, "Elsewhere").await;

    let category = app.category_service.get(product.category_id).await.unwrap();
    let by_slug = app
        .catalog
        .list_public(&PublicListParams {
            category: Some(category.category.slug.clone()),
            ..PublicListParams::default()
        })
        .await
        .unwrap();
    assert_eq!(by_slug.total_items, 1);
    assert_eq!(by_slug.items[0].id, product.id);

    let by_id = app
        .catalog
        .list_public(&PublicListParams {
            category: Some(product.category_id.to_string()),
            ..PublicListParams::default()
        })
        .await
        .unwrap();
    assert_eq!(by_id.total_items, 1);

    let unknown = app
        .catalog
        .list_public(&PublicListParams {
            category: Some("no-such-category".into()),
            ..PublicListParams::default()
        })
        .await
        .unwrap();
    assert!(unknown.items.is_empty());
    assert_eq!(unknown.total_pages, 0);
}

#[tokio::test]
async fn test_unknown_sort_field_is_rejected() {
    let app = TestApp::new();
    let err = app
        .catalog
        .list_public(&PublicListParams {
            sort_by: Some("password".into()),
            ..PublicListParams::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_listed_media_urls_are_absolute() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Photographed", category.category.id);
    req.media.images = vec![image("front.jpg")];
    app.product_service.create(&top, req).await.unwrap();

    let page = app
        .catalog
        .list_public(&PublicListParams::default())
        .await
        .unwrap();
    let url = &page.items[0].images[0].url;
    assert!(url.starts_with("https://burma-rubies.com/uploads/products/images/"));

    let stored = app
        .products
        .find_by_sku(&page.items[0].sku)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.images[0].url.starts_with("/uploads/"));
}

#[tokio::test]
async fn test_stats_follow_operator_scope() {
    let app = TestApp::new();
    let alice = admin();
    let top = superadmin();
    app.create_product(&alice, "Stat One").await;
    let second = app.create_product(&alice, "Stat Two").await;
    app.create_product(&top, "Stat Three").await;
    app.product_service
        .reject(&top, second.id, "Inclusions not disclosed")
        .await
        .unwrap();

    let mine = app.catalog.stats(&alice).await.unwrap();
    assert_eq!(mine.total_products, 2);
    assert_eq!(mine.pending, 1);
    assert_eq!(mine.rejected, 1);
    assert_eq!(mine.approved, 0);

    let all = app.catalog.stats(&top).await.unwrap();
    assert_eq!(all.total_products, 3);
    assert_eq!(all.approved, 1);
    assert_eq!(all.active_categories, 3);
}
