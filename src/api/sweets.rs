use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::Value;
use std::sync::Arc;

use super::auth::{AdminUser, AuthUser};
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::types::{CreateSweetRequest, MessageResponse, SearchParams, UpdateSweetRequest};
use super::validation::{non_blank, parse_price, parse_price_bound, parse_stock, required_text};
use super::{ApiError, AppState};
use crate::constants::images::FORM_FIELD;
use crate::models::{NewSweet, Sweet, SweetFilter, SweetPatch};
use crate::services::ImageUpload;

// ============================================================================
// Create form
// ============================================================================

/// Body of `POST /sweets`: JSON, or `multipart/form-data` with text fields and
/// an optional `image` file part.
#[derive(Debug, Default)]
pub struct CreateSweetForm {
    pub fields: CreateSweetRequest,
    pub image: Option<ImageUpload>,
}

impl<S: Send + Sync> FromRequest<S> for CreateSweetForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::validation(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let Json(fields) = Json::<CreateSweetRequest>::from_request(req, state).await?;

        Ok(Self {
            fields,
            image: None,
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<CreateSweetForm, ApiError> {
    let mut form = CreateSweetForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == FORM_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;

            // Browsers submit an empty part when no file was picked.
            if bytes.is_empty() {
                continue;
            }

            form.image = Some(ImageUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let text = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "name" => form.fields.name = Some(text),
            "category" => form.fields.category = Some(text),
            "price" => form.fields.price = Some(Value::String(text)),
            "quantity" => form.fields.quantity = Some(Value::String(text)),
            "imageUrl" | "image_url" => form.fields.image_url = non_blank(Some(text)),
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::validation(err.body_text())
    }
}

impl TryFrom<CreateSweetRequest> for NewSweet {
    type Error = ApiError;

    fn try_from(req: CreateSweetRequest) -> Result<Self, Self::Error> {
        let name = required_text("name", req.name)?;
        let category = required_text("category", req.category)?;
        let price = parse_price(
            req.price
                .as_ref()
                .ok_or_else(|| ApiError::validation("price is required"))?,
        )?;
        let quantity = parse_stock(
            req.quantity
                .as_ref()
                .ok_or_else(|| ApiError::validation("quantity is required"))?,
        )?;

        Ok(Self {
            name,
            category,
            price,
            quantity,
            image_url: non_blank(req.image_url),
        })
    }
}

impl TryFrom<UpdateSweetRequest> for SweetPatch {
    type Error = ApiError;

    fn try_from(req: UpdateSweetRequest) -> Result<Self, Self::Error> {
        let text = |field: &str, value: Option<Option<String>>| match value {
            None => Ok(None),
            Some(v) => required_text(field, v).map(Some),
        };

        let image_url = match req.image_url {
            None => None,
            Some(None) => return Err(ApiError::validation("imageUrl cannot be null")),
            Some(Some(url)) => Some(url.trim().to_string()),
        };

        Ok(Self {
            name: text("name", req.name)?,
            category: text("category", req.category)?,
            price: req.price.as_ref().map(parse_price).transpose()?,
            quantity: req.quantity.as_ref().map(parse_stock).transpose()?,
            image_url,
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /sweets
pub async fn list_sweets(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<Sweet>>, ApiError> {
    let sweets = state.catalog().list_sweets().await?;
    Ok(Json(sweets))
}

/// GET /sweets/search
///
/// `q` matches name or category; `name` and `category` are case-insensitive
/// substring filters; `minPrice`/`maxPrice` are inclusive bounds.
pub async fn search_sweets(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<Sweet>>, ApiError> {
    let filter = SweetFilter {
        text: non_blank(params.q),
        name: non_blank(params.name),
        category: non_blank(params.category),
        min_price: parse_price_bound("minPrice", params.min_price.as_deref())?,
        max_price: parse_price_bound("maxPrice", params.max_price.as_deref())?,
    };

    let sweets = state.catalog().search_sweets(filter).await?;
    Ok(Json(sweets))
}

/// GET /sweets/{id}
pub async fn get_sweet(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Sweet>, ApiError> {
    let sweet = state.catalog().get_sweet(id).await?;
    Ok(Json(sweet))
}

/// POST /sweets
pub async fn create_sweet(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    form: CreateSweetForm,
) -> Result<impl IntoResponse, ApiError> {
    let new_sweet = NewSweet::try_from(form.fields)?;
    let sweet = state.catalog().create_sweet(new_sweet, form.image).await?;
    Ok((StatusCode::CREATED, Json(sweet)))
}

/// PUT /sweets/{id}
pub async fn update_sweet(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<UpdateSweetRequest>,
) -> Result<Json<Sweet>, ApiError> {
    let patch = SweetPatch::try_from(payload)?;
    let sweet = state.catalog().update_sweet(id, patch).await?;
    Ok(Json(sweet))
}

/// DELETE /sweets/{id}
pub async fn delete_sweet(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog().delete_sweet(id).await?;
    Ok(Json(MessageResponse::new("Sweet deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_sweet_from_request() {
        let req = CreateSweetRequest {
            name: Some(" Lemon Drop ".to_string()),
            category: Some("Hard Candy".to_string()),
            price: Some(json!("1.50")),
            quantity: Some(json!(10)),
            image_url: Some(String::new()),
        };

        let sweet = NewSweet::try_from(req).unwrap();
        assert_eq!(sweet.name, "Lemon Drop");
        assert_eq!(sweet.price, 1.5);
        assert_eq!(sweet.quantity, 10);
        assert_eq!(sweet.image_url, None);
    }

    #[test]
    fn test_new_sweet_requires_every_field() {
        let req = CreateSweetRequest {
            name: Some("Toffee".to_string()),
            category: Some("Chewy".to_string()),
            price: None,
            quantity: Some(json!(1)),
            image_url: None,
        };
        assert!(matches!(
            NewSweet::try_from(req),
            Err(ApiError::ValidationError(_))
        ));

        let req = CreateSweetRequest {
            name: Some("   ".to_string()),
            category: Some("Chewy".to_string()),
            price: Some(json!(1)),
            quantity: Some(json!(1)),
            image_url: None,
        };
        assert!(NewSweet::try_from(req).is_err());
    }

    #[test]
    fn test_patch_from_request() {
        let req: UpdateSweetRequest = serde_json::from_value(json!({"price": 2.5})).unwrap();
        let patch = SweetPatch::try_from(req).unwrap();
        assert_eq!(patch.price, Some(2.5));
        assert!(patch.name.is_none());

        let req: UpdateSweetRequest = serde_json::from_value(json!({"name": null})).unwrap();
        assert!(SweetPatch::try_from(req).is_err());

        let req: UpdateSweetRequest = serde_json::from_value(json!({"quantity": -1})).unwrap();
        assert!(SweetPatch::try_from(req).is_err());

        let req: UpdateSweetRequest = serde_json::from_value(json!({})).unwrap();
        assert!(SweetPatch::try_from(req).unwrap().is_empty());
    }
}
