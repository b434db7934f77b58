//! Integration tests for the product lifecycle and moderation workflow.

mod helpers;

use gemhub_core::error::ErrorKind;
use gemhub_core::traits::Repository;
use gemhub_entity::product::{
    AvailabilityStatus, ModerationStatus, Price, Currency, Treatment, TreatmentType,
};
use gemhub_service::{UpdateProductRequest, slugify};
use gemhub_service::identifier::is_valid_sku;

use helpers::{TestApp, admin, ruby_request, superadmin};

#[tokio::test]
async fn test_create_as_operator_starts_pending() {
    let app = TestApp::new();
    let operator = admin();
    let category = app.create_category("Loose Rubies").await;

    let product = app
        .product_service
        .create(&operator, ruby_request("Vivid Oval 2ct", category.category.id))
        .await
        .unwrap();

    assert_eq!(product.slug, slugify("Vivid Oval 2ct"));
    assert!(is_valid_sku("RBY", &product.sku), "bad SKU {}", product.sku);
    assert_eq!(product.moderation.status, ModerationStatus::Pending);
    assert_eq!(product.status, AvailabilityStatus::Pending);
    assert!(product.moderation.approved_by.is_none());
    assert_eq!(product.created_by, operator.user_id);
    assert_eq!(product.category_name, "Loose Rubies");
}

#[tokio::test]
async fn test_create_as_top_role_starts_approved() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Loose Rubies").await;

    let product = app
        .product_service
        .create(&top, ruby_request("Vivid Oval 2ct", category.category.id))
        .await
        .unwrap();

    assert_eq!(product.moderation.status, ModerationStatus::Approved);
    assert_eq!(product.status, AvailabilityStatus::Available);
    assert_eq!(product.moderation.approved_by, Some(top.user_id));
    assert!(product.moderation.approved_at.is_some());
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let app = TestApp::new();
    let operator = admin();
    let category = app.create_category("Loose Rubies").await;
    app.product_service
        .create(&operator, ruby_request("Pigeon Blood Oval", category.category.id))
        .await
        .unwrap();

    let err = app
        .product_service
        .create(&operator, ruby_request("  pigeon blood   OVAL! ", category.category.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(app.products.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_only_top_role_approves() {
    let app = TestApp::new();
    let operator = admin();
    let product = app.create_product(&operator, "Awaiting Review").await;

    let err = app
        .product_service
        .approve(&operator, product.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let stored = app.products.find_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.moderation.status, ModerationStatus::Pending);
    assert_eq!(stored.status, AvailabilityStatus::Pending);

    let top = superadmin();
    let approved = app.product_service.approve(&top, product.id).await.unwrap();
    assert_eq!(approved.moderation.status, ModerationStatus::Approved);
    assert_eq!(approved.status, AvailabilityStatus::Available);
    assert_eq!(approved.moderation.approved_by, Some(top.user_id));

    let err = app.product_service.approve(&top, product.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_operator_cannot_reject() {
    let app = TestApp::new();
    let operator = admin();
    let product = app.create_product(&operator, "Self Reject").await;

    let err = app
        .product_service
        .reject(&operator, product.id, "Changed my mind")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_reject_without_reason_changes_nothing() {
    let app = TestApp::new();
    let product = app.create_product(&admin(), "Needs Reason").await;

    let err = app
        .product_service
        .reject(&superadmin(), product.id, "   ")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let stored = app.products.find_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.moderation.status, ModerationStatus::Pending);
    assert_eq!(stored.status, AvailabilityStatus::Pending);
    assert!(stored.moderation.rejection_reason.is_none());
}

#[tokio::test]
async fn test_reject_archives_with_reason() {
    let app = TestApp::new();
    let product = app.create_product(&admin(), "Glass Filled").await;

    let rejected = app
        .product_service
        .reject(&superadmin(), product.id, "Undisclosed glass filling")
        .await
        .unwrap();
    assert_eq!(rejected.moderation.status, ModerationStatus::Rejected);
    assert_eq!(rejected.status, AvailabilityStatus::Archived);
    assert_eq!(
        rejected.moderation.rejection_reason.as_deref(),
        Some("Undisclosed glass filling")
    );
}

#[tokio::test]
async fn test_operator_edit_demotes_approved_product() {
    let app = TestApp::new();
    let operator = admin();
    let product = app.create_product(&operator, "Demote Me").await;
    app.product_service
        .approve(&superadmin(), product.id)
        .await
        .unwrap();

    let edited = app
        .product_service
        .update(&operator, product.id, UpdateProductRequest::default())
        .await
        .unwrap();
    assert_eq!(edited.moderation.status, ModerationStatus::Pending);
    assert_eq!(edited.status, AvailabilityStatus::Pending);
    assert!(edited.moderation.approved_by.is_none());
}

#[tokio::test]
async fn test_top_role_edit_keeps_approval() {
    let app = TestApp::new();
    let operator = admin();
    let top = superadmin();
    let product = app.create_product(&operator, "Keep Approval").await;
    app.product_service.approve(&top, product.id).await.unwrap();

    let edited = app
        .product_service
        .update(
            &top,
            product.id,
            UpdateProductRequest {
                featured: Some(true),
                ..UpdateProductRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.moderation.status, ModerationStatus::Approved);
    assert_eq!(edited.status, AvailabilityStatus::Available);
    assert!(edited.featured);
}

#[tokio::test]
async fn test_edit_after_rejection_resubmits() {
    let app = TestApp::new();
    let operator = admin();
    let product = app.create_product(&operator, "Second Chance").await;
    app.product_service
        .reject(&superadmin(), product.id, "Blurry photos")
        .await
        .unwrap();

    let edited = app
        .product_service
        .update(
            &operator,
            product.id,
            UpdateProductRequest {
                short_description: Some("Re-shot in daylight".into()),
                ..UpdateProductRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.moderation.status, ModerationStatus::Pending);
    assert_eq!(edited.status, AvailabilityStatus::Pending);
}

#[tokio::test]
async fn test_request_revision_then_resubmit() {
    let app = TestApp::new();
    let operator = admin();
    let top = superadmin();
    let product = app.create_product(&operator, "Revise Me").await;
    app.product_service.approve(&top, product.id).await.unwrap();

    let revised = app
        .product_service
        .request_revision(&top, product.id, Some("Add the GRS report".into()))
        .await
        .unwrap();
    assert_eq!(revised.moderation.status, ModerationStatus::NeedsRevision);
    assert_eq!(revised.status, AvailabilityStatus::Pending);
    assert_eq!(
        revised.moderation.internal_notes.as_deref(),
        Some("Add the GRS report")
    );

    let edited = app
        .product_service
        .update(&operator, product.id, UpdateProductRequest::default())
        .await
        .unwrap();
    assert_eq!(edited.moderation.status, ModerationStatus::Pending);
}

#[tokio::test]
async fn test_other_operator_cannot_edit_or_delete() {
    let app = TestApp::new();
    let owner = admin();
    let intruder = admin();
    let product = app.create_product(&owner, "Not Yours").await;

    let err = app
        .product_service
        .update(
            &intruder,
            product.id,
            UpdateProductRequest {
                name: Some("Stolen".into()),
                ..UpdateProductRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let err = app
        .product_service
        .delete(&intruder, product.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let stored = app.products.find_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Not Yours");
}

#[tokio::test]
async fn test_update_recomputes_derived_fields() {
    let app = TestApp::new();
    let operator = admin();
    let product = app.create_product(&operator, "Derived Values").await;
    assert_eq!(product.price.price_per_carat, Some(1500.0));
    assert_eq!(product.dimensions.ratio, Some(1.34));
    assert!(!product.features.unheated);

    let edited = app
        .product_service
        .update(
            &operator,
            product.id,
            UpdateProductRequest {
                carat: Some(3.0),
                price: Some(Price {
                    amount: 10_000.0,
                    currency: Currency::Usd,
                    price_per_carat: Some(1.0),
                    compare_at_price: None,
                }),
                treatment: Some(Treatment {
                    heated: false,
                    treatment_type: TreatmentType::None,
                    description: None,
                }),
                ..UpdateProductRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.price.price_per_carat, Some(3333.33));
    assert!(edited.features.unheated);
}

#[tokio::test]
async fn test_rename_regenerates_slug_and_checks_uniqueness() {
    let app = TestApp::new();
    let operator = admin();
    let first = app.create_product(&operator, "First Stone").await;
    let second = app.create_product(&operator, "Second Stone").await;

    let renamed = app
        .product_service
        .update(
            &operator,
            first.id,
            UpdateProductRequest {
                name: Some("Renamed Stone".into()),
                ..UpdateProductRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.slug, "renamed-stone");
    assert_eq!(renamed.sku, first.sku);

    let err = app
        .product_service
        .update(
            &operator,
            second.id,
            UpdateProductRequest {
                name: Some("Renamed Stone".into()),
                ..UpdateProductRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_category_change_restamps_name() {
    let app = TestApp::new();
    let operator = admin();
    let product = app.create_product(&operator, "Moving Stone").await;
    let target = app.create_category("Star Rubies").await;

    let moved = app
        .product_service
        .update(
            &operator,
            product.id,
            UpdateProductRequest {
                category_id: Some(target.category.id),
                ..UpdateProductRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.category_id, target.category.id);
    assert_eq!(moved.category_name, "Star Rubies");
}

#[tokio::test]
async fn test_missing_required_group_is_validation_error() {
    let app = TestApp::new();
    let category = app.create_category("Loose Rubies").await;
    let mut req = ruby_request("Incomplete", category.category.id);
    req.dimensions = None;

    let err = app.product_service.create(&admin(), req).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.products.count().await.unwrap(), 0);
}
