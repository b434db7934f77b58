//! Integration tests for media attach, detach, and cascade removal.

mod helpers;

use bytes::Bytes;

use gemhub_core::error::ErrorKind;
use gemhub_core::traits::Repository;
use gemhub_core::traits::asset_store::{AssetStore, AssetUpload};
use gemhub_core::types::ProductId;
use gemhub_entity::product::{ImageRole, MediaKind, ModerationStatus};
use gemhub_service::{MediaUploads, UpdateProductRequest};

use helpers::{TestApp, admin, image, relative, ruby_request, superadmin, video};

#[tokio::test]
async fn test_create_stores_media_and_marks_primary() {
    let app = TestApp::new();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Photographed Oval", category.category.id);
    req.media = MediaUploads {
        images: vec![image("front.jpg"), image("back.jpg")],
        videos: vec![video("spin.mp4")],
        certificate_images: vec![image("grs.jpg")],
    };

    let product = app.product_service.create(&admin(), req).await.unwrap();

    assert_eq!(product.images.len(), 2);
    assert!(product.images[0].is_primary);
    assert_eq!(product.images[0].role, ImageRole::Main);
    assert_eq!(product.images[1].role, ImageRole::Daylight);
    assert_eq!(product.images[1].order, 1);
    assert_eq!(product.videos.len(), 1);
    assert_eq!(product.certification.certificate_images.len(), 1);
    assert_eq!(app.store.inner.len().await, 4);

    for (_, url) in product.media_urls() {
        assert!(app.store.inner.contains(&relative(&url)).await, "missing {url}");
    }
}

#[tokio::test]
async fn test_failed_store_aborts_create() {
    let app = TestApp::new();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Unstored", category.category.id);
    req.media.images = vec![image("front.jpg")];
    app.store.fail_stores(true);

    let err = app.product_service.create(&admin(), req).await.unwrap_err();
    assert!(err.kind.is_dependency());
    assert_eq!(app.products.count().await.unwrap(), 0);
    assert!(app.store.inner.is_empty().await);
}

#[tokio::test]
async fn test_invalid_upload_is_rejected_before_storing() {
    let app = TestApp::new();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Wrong Type", category.category.id);
    req.media = MediaUploads {
        images: vec![image("front.jpg")],
        videos: vec![AssetUpload::new(
            "notes.txt",
            "text/plain",
            Bytes::from_static(b"not a video"),
        )],
        ..MediaUploads::default()
    };

    let err = app.product_service.create(&admin(), req).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(app.store.inner.is_empty().await);
    assert_eq!(app.products.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_appends_media() {
    let app = TestApp::new();
    let operator = admin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Growing Gallery", category.category.id);
    req.media.images = vec![image("one.jpg")];
    let product = app.product_service.create(&operator, req).await.unwrap();

    let updated = app
        .product_service
        .update(
            &operator,
            product.id,
            UpdateProductRequest {
                media: MediaUploads {
                    images: vec![image("two.jpg")],
                    ..MediaUploads::default()
                },
                ..UpdateProductRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.images.len(), 2);
    assert_eq!(updated.images[0].url, product.images[0].url);
    assert!(updated.images[0].is_primary);
    assert!(!updated.images[1].is_primary);
}

#[tokio::test]
async fn test_detach_removes_exactly_one_reference() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Two Photos", category.category.id);
    req.media.images = vec![image("keep.jpg"), image("drop.jpg")];
    let product = app.product_service.create(&top, req).await.unwrap();
    let drop_url = product.images[1].url.clone();
    let keep_url = product.images[0].url.clone();

    let done = app
        .product_service
        .remove_media(&top, product.id, MediaKind::Image, &drop_url)
        .await
        .unwrap();
    assert!(!done.is_partial());
    assert_eq!(done.value.images.len(), 1);
    assert_eq!(done.value.images[0].url, keep_url);

    let stored = app.products.find_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(stored.images.len(), 1);
    assert!(!app.store.inner.contains(&relative(&drop_url)).await);
    assert!(app.store.inner.contains(&relative(&keep_url)).await);
}

#[tokio::test]
async fn test_detach_accepts_relative_url() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Relative Path", category.category.id);
    req.media.videos = vec![video("spin.mp4")];
    let product = app.product_service.create(&top, req).await.unwrap();
    let path = relative(&product.videos[0].url);

    let done = app
        .product_service
        .remove_media(&top, product.id, MediaKind::Video, &path)
        .await
        .unwrap();
    assert!(done.value.videos.is_empty());
    assert!(app.store.inner.is_empty().await);
}

#[tokio::test]
async fn test_detach_of_absent_reference_is_noop() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Untouched", category.category.id);
    req.media.images = vec![image("only.jpg")];
    let product = app.product_service.create(&top, req).await.unwrap();
    let before = app.products.find_by_id(&product.id).await.unwrap().unwrap();

    let done = app
        .product_service
        .remove_media(
            &top,
            product.id,
            MediaKind::Image,
            "https://burma-rubies.com/uploads/products/images/nope.jpg",
        )
        .await
        .unwrap();
    assert!(!done.is_partial());
    assert_eq!(done.value.images.len(), 1);

    let after = app.products.find_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(before, after);
    assert_eq!(app.store.inner.len().await, 1);

    let same_url_wrong_list = app
        .product_service
        .remove_media(&top, product.id, MediaKind::Certificate, &product.images[0].url)
        .await
        .unwrap();
    assert_eq!(same_url_wrong_list.value.images.len(), 1);
    assert_eq!(app.store.inner.len().await, 1);
}

#[tokio::test]
async fn test_detach_survives_store_failure() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Stubborn File", category.category.id);
    req.media.images = vec![image("stuck.jpg")];
    let product = app.product_service.create(&top, req).await.unwrap();
    app.store.fail_removes(true);

    let done = app
        .product_service
        .remove_media(&top, product.id, MediaKind::Image, &product.images[0].url)
        .await
        .unwrap();
    assert!(done.is_partial());
    assert!(done.value.images.is_empty());

    let stored = app.products.find_by_id(&product.id).await.unwrap().unwrap();
    assert!(stored.images.is_empty());
}

#[tokio::test]
async fn test_detach_of_missing_file_is_clean() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Vanished File", category.category.id);
    req.media.images = vec![image("gone.jpg")];
    let product = app.product_service.create(&top, req).await.unwrap();

    app.store
        .inner
        .remove(&relative(&product.images[0].url))
        .await
        .unwrap();

    let done = app
        .product_service
        .remove_media(&top, product.id, MediaKind::Image, &product.images[0].url)
        .await
        .unwrap();
    assert!(!done.is_partial());
    assert!(done.value.images.is_empty());
}

#[tokio::test]
async fn test_operator_detach_demotes_approved_product() {
    let app = TestApp::new();
    let operator = admin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Edited Gallery", category.category.id);
    req.media.images = vec![image("a.jpg")];
    let product = app.product_service.create(&operator, req).await.unwrap();
    app.product_service
        .approve(&superadmin(), product.id)
        .await
        .unwrap();

    let done = app
        .product_service
        .remove_media(&operator, product.id, MediaKind::Image, &product.images[0].url)
        .await
        .unwrap();
    assert_eq!(
        done.value.moderation.status,
        ModerationStatus::Pending
    );
}

#[tokio::test]
async fn test_delete_cascades_media() {
    let app = TestApp::new();
    let operator = admin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Full Gallery", category.category.id);
    req.media = MediaUploads {
        images: vec![image("a.jpg"), image("b.jpg")],
        videos: vec![video("c.mp4")],
        certificate_images: vec![image("d.jpg")],
    };
    let product = app.product_service.create(&operator, req).await.unwrap();
    assert_eq!(app.store.inner.len().await, 4);

    let done = app.product_service.delete(&operator, product.id).await.unwrap();
    assert!(!done.is_partial());
    assert!(app.store.inner.is_empty().await);
    assert!(app.products.find_by_id(&product.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_proceeds_when_files_cannot_be_removed() {
    let app = TestApp::new();
    let top = superadmin();
    let category = app.create_category("Media").await;
    let mut req = ruby_request("Leaky Gallery", category.category.id);
    req.media.images = vec![image("a.jpg"), image("b.jpg")];
    let product = app.product_service.create(&top, req).await.unwrap();
    app.store.fail_removes(true);

    let done = app.product_service.delete(&top, product.id).await.unwrap();
    assert!(done.is_partial());
    assert_eq!(done.warnings.len(), 2);
    assert!(app.products.find_by_id(&product.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_of_unknown_product_is_not_found() {
    let app = TestApp::new();
    let err = app
        .product_service
        .delete(&superadmin(), ProductId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
