//! Tests for the recipe service.

use std::str::FromStr;
use std::sync::Arc;

use mockall::predicate::{always, eq};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use super::*;
use crate::domain::ports::{MockImageStore, MockLabelRepository, MockRecipeRepository};
use crate::domain::recipe_image::MockUploadIdGenerator;
use crate::domain::recipe_image::tests::sample_png;
use crate::domain::{
    CookingTime, ErrorCode, ImagePath, LabelName, Price, RecipeLink, RecipeTitle,
};

type Service = RecipeService<MockRecipeRepository, MockLabelRepository, MockImageStore>;

struct Mocks {
    recipes: MockRecipeRepository,
    labels: MockLabelRepository,
    images: MockImageStore,
    ids: MockUploadIdGenerator,
}

impl Mocks {
    fn into_service(self) -> Service {
        RecipeService::new(
            Arc::new(self.recipes),
            Arc::new(self.labels),
            Arc::new(self.images),
            Arc::new(self.ids),
        )
    }
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        recipes: MockRecipeRepository::new(),
        labels: MockLabelRepository::new(),
        images: MockImageStore::new(),
        ids: MockUploadIdGenerator::new(),
    }
}

#[fixture]
fn owner() -> UserId {
    UserId::random()
}

fn draft(tags: &[i64], ingredients: &[i64]) -> RecipeDraft {
    RecipeDraft {
        title: RecipeTitle::new("Chocolate cheesecake").expect("title"),
        time_minutes: CookingTime::new(5).expect("time"),
        price: Price::new(Decimal::from_str("5.25").expect("decimal")).expect("price"),
        link: RecipeLink::parse("https://example.com/recipe.pdf").expect("link"),
        tags: tags.iter().copied().map(LabelId::new).collect(),
        ingredients: ingredients.iter().copied().map(LabelId::new).collect(),
    }
}

fn stored(id: i64, owner: UserId, draft: &RecipeDraft) -> Recipe {
    Recipe {
        id: RecipeId::new(id),
        owner,
        title: draft.title.clone(),
        time_minutes: draft.time_minutes,
        price: draft.price,
        link: draft.link.clone(),
        tags: draft.tags.clone(),
        ingredients: draft.ingredients.clone(),
        image: None,
    }
}

fn label(id: i64, kind: LabelKind, owner: UserId) -> Label {
    Label {
        id: LabelId::new(id),
        kind,
        owner,
        name: LabelName::new(&format!("label-{id}")).expect("name"),
    }
}

fn labels_echo(mocks: &mut Mocks) {
    mocks
        .labels
        .expect_find_many()
        .returning(|owner, kind, ids| {
            Ok(ids.iter().map(|id| label(id.get(), kind, *owner)).collect())
        });
}

#[rstest]
#[tokio::test]
async fn create_checks_labels_then_persists(mut mocks: Mocks, owner: UserId) {
    labels_echo(&mut mocks);
    mocks
        .recipes
        .expect_create()
        .times(1)
        .returning(|owner, draft| Ok(stored(1, *owner, draft)));

    let recipe = mocks
        .into_service()
        .create(&owner, draft(&[2, 1, 2], &[3]))
        .await
        .expect("created");

    assert_eq!(recipe.owner, owner);
    assert_eq!(recipe.tags, vec![LabelId::new(1), LabelId::new(2)]);
}

#[rstest]
#[tokio::test]
async fn create_rejects_foreign_labels_without_writing(mut mocks: Mocks, owner: UserId) {
    mocks
        .labels
        .expect_find_many()
        .with(always(), eq(LabelKind::Tag), always())
        .returning(|_, _, _| Ok(Vec::new()));
    mocks
        .labels
        .expect_find_many()
        .with(always(), eq(LabelKind::Ingredient), always())
        .returning(|owner, kind, ids| {
            Ok(ids.iter().map(|id| label(id.get(), kind, *owner)).collect())
        });
    mocks.recipes.expect_create().never();

    let err = mocks
        .into_service()
        .create(&owner, draft(&[9], &[3]))
        .await
        .expect_err("rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let fields = err.field_errors();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].field(), "tags");
    assert_eq!(fields[0].code(), "does_not_exist");
}

#[rstest]
#[tokio::test]
async fn detail_inlines_labels(mut mocks: Mocks, owner: UserId) {
    labels_echo(&mut mocks);
    let recipe = stored(4, owner, &draft(&[1], &[2, 3]));
    mocks
        .recipes
        .expect_find()
        .with(eq(owner), eq(RecipeId::new(4)))
        .returning(move |_, _| Ok(Some(recipe.clone())));

    let detail = mocks
        .into_service()
        .detail(&owner, RecipeId::new(4))
        .await
        .expect("detail");

    assert_eq!(detail.tags.len(), 1);
    assert_eq!(detail.ingredients.len(), 2);
    assert_eq!(detail.ingredients[0].kind, LabelKind::Ingredient);
}

#[rstest]
#[tokio::test]
async fn detail_of_foreign_recipe_is_not_found(mut mocks: Mocks, owner: UserId) {
    mocks.recipes.expect_find().returning(|_, _| Ok(None));

    let err = mocks
        .into_service()
        .detail(&owner, RecipeId::new(4))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn patch_merges_and_updates(mut mocks: Mocks, owner: UserId) {
    labels_echo(&mut mocks);
    let current = stored(4, owner, &draft(&[1], &[]));
    mocks
        .recipes
        .expect_find()
        .returning(move |_, _| Ok(Some(current.clone())));
    mocks
        .recipes
        .expect_update()
        .withf(|_, _, draft| draft.title.as_str() == "New title" && draft.tags.len() == 1)
        .times(1)
        .returning(|owner, id, draft| Ok(Some(stored(id.get(), *owner, draft))));

    let patch = RecipePatch {
        title: Some(RecipeTitle::new("New title").expect("title")),
        ..RecipePatch::default()
    };
    let updated = mocks
        .into_service()
        .patch(&owner, RecipeId::new(4), patch)
        .await
        .expect("patched");
    assert_eq!(updated.title.as_str(), "New title");
    assert_eq!(updated.price, current_price());
}

fn current_price() -> Price {
    draft(&[], &[]).price
}

#[rstest]
#[tokio::test]
async fn delete_missing_recipe_is_not_found(mut mocks: Mocks, owner: UserId) {
    mocks.recipes.expect_find().returning(|_, _| Ok(None));
    mocks.recipes.expect_delete().never();

    let err = mocks
        .into_service()
        .delete(&owner, RecipeId::new(1))
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn upload_image_stores_file_and_sets_path(mut mocks: Mocks, owner: UserId) {
    let current = stored(4, owner, &draft(&[], &[]));
    mocks
        .recipes
        .expect_find()
        .returning(move |_, _| Ok(Some(current.clone())));
    mocks
        .ids
        .expect_next_id()
        .returning(|| "test-uuid".to_owned());
    mocks
        .images
        .expect_save()
        .withf(|path, bytes| path.as_str() == "uploads/recipe/test-uuid.png" && !bytes.is_empty())
        .times(1)
        .returning(|_, _| Ok(()));
    mocks
        .recipes
        .expect_set_image()
        .returning(move |owner, id, path| {
            let mut recipe = stored(id.get(), *owner, &draft(&[], &[]));
            recipe.image = Some(path.clone());
            Ok(Some(recipe))
        });
    mocks.images.expect_remove().never();

    let upload = ImageUpload {
        file_name: "photo.png".to_owned(),
        bytes: sample_png(),
    };
    let recipe = mocks
        .into_service()
        .upload_image(&owner, RecipeId::new(4), upload)
        .await
        .expect("uploaded");
    assert_eq!(
        recipe.image,
        Some(ImagePath::from_stored("uploads/recipe/test-uuid.png"))
    );
}

#[rstest]
#[case::repository_failure(false)]
#[case::recipe_vanished(true)]
#[tokio::test]
async fn upload_removes_saved_file_when_linking_fails(
    mut mocks: Mocks,
    owner: UserId,
    #[case] vanished: bool,
) {
    let current = stored(4, owner, &draft(&[], &[]));
    mocks
        .recipes
        .expect_find()
        .returning(move |_, _| Ok(Some(current.clone())));
    mocks
        .ids
        .expect_next_id()
        .returning(|| "test-uuid".to_owned());
    mocks.images.expect_save().times(1).returning(|_, _| Ok(()));
    mocks
        .recipes
        .expect_set_image()
        .returning(move |_, _, _| {
            if vanished {
                Ok(None)
            } else {
                Err(RecipePersistenceError::query("value too long"))
            }
        });
    mocks
        .images
        .expect_remove()
        .withf(|path| path.as_str() == "uploads/recipe/test-uuid.png")
        .times(1)
        .returning(|_| Ok(()));

    let upload = ImageUpload {
        file_name: "photo.png".to_owned(),
        bytes: sample_png(),
    };
    let err = mocks
        .into_service()
        .upload_image(&owner, RecipeId::new(4), upload)
        .await
        .expect_err("linking fails");
    let expected = if vanished {
        ErrorCode::NotFound
    } else {
        ErrorCode::InternalError
    };
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn upload_rejects_non_image_without_storing(mut mocks: Mocks, owner: UserId) {
    let current = stored(4, owner, &draft(&[], &[]));
    mocks
        .recipes
        .expect_find()
        .returning(move |_, _| Ok(Some(current.clone())));
    mocks.images.expect_save().never();
    mocks.recipes.expect_set_image().never();

    let upload = ImageUpload {
        file_name: "notes.txt".to_owned(),
        bytes: b"notimage".to_vec(),
    };
    let err = mocks
        .into_service()
        .upload_image(&owner, RecipeId::new(4), upload)
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.field_errors()[0].field(), "image");
}

#[rstest]
fn image_url_delegates_to_store(mut mocks: Mocks, owner: UserId) {
    mocks
        .images
        .expect_url()
        .returning(|path| format!("/media/{}", path.as_str()));
    let mut recipe = stored(1, owner, &draft(&[], &[]));
    let service = mocks.into_service();
    assert_eq!(service.image_url(&recipe), None);

    recipe.image = Some(ImagePath::from_stored("uploads/recipe/a.jpg"));
    assert_eq!(
        service.image_url(&recipe).as_deref(),
        Some("/media/uploads/recipe/a.jpg")
    );
}
