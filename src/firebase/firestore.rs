//! Firestore gateway
//!
//! Records live in one collection with the fields `text`, `completed`,
//! `userId` and `timestamp`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use js_sys::Reflect;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use firetodo_core::domain::StoreResult;
use firetodo_core::gateway::{ErrorCallback, SnapshotCallback};
use firetodo_core::{
    DocumentStore, NewTodo, OwnerId, Snapshot, StoreError, StoreErrorKind, Subscription, Todo, TodoId, TodoPatch,
    TodoQuery,
};

use super::{release, store_error};

const OWNER_FIELD: &str = "userId";
const CREATED_FIELD: &str = "timestamp";

#[wasm_bindgen]
extern "C" {
    type Firestore;

    #[wasm_bindgen(js_namespace = firebase, js_name = firestore)]
    fn firestore() -> Firestore;

    #[wasm_bindgen(method)]
    fn collection(this: &Firestore, path: &str) -> CollectionReference;

    type Query;

    #[wasm_bindgen(method, js_name = "where")]
    fn where_(this: &Query, field: &str, op: &str, value: &JsValue) -> Query;

    #[wasm_bindgen(method, js_name = orderBy)]
    fn order_by(this: &Query, field: &str, direction: &str) -> Query;

    #[wasm_bindgen(method, js_name = onSnapshot)]
    fn on_snapshot(
        this: &Query,
        on_next: &Closure<dyn FnMut(QuerySnapshot)>,
        on_error: &Closure<dyn FnMut(JsValue)>,
    ) -> js_sys::Function;

    #[wasm_bindgen(extends = Query)]
    type CollectionReference;

    #[wasm_bindgen(method, catch)]
    async fn add(this: &CollectionReference, data: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method)]
    fn doc(this: &CollectionReference, id: &str) -> DocumentReference;

    type DocumentReference;

    #[wasm_bindgen(method, getter)]
    fn id(this: &DocumentReference) -> String;

    #[wasm_bindgen(method, catch)]
    async fn update(this: &DocumentReference, data: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = delete)]
    async fn remove(this: &DocumentReference) -> Result<JsValue, JsValue>;

    type QuerySnapshot;

    #[wasm_bindgen(method, getter)]
    fn docs(this: &QuerySnapshot) -> js_sys::Array;

    type QueryDocumentSnapshot;

    #[wasm_bindgen(method, getter, js_name = id)]
    fn doc_id(this: &QueryDocumentSnapshot) -> String;

    #[wasm_bindgen(method)]
    fn data(this: &QueryDocumentSnapshot) -> JsValue;

    type Timestamp;

    #[wasm_bindgen(method, js_name = toMillis)]
    fn to_millis(this: &Timestamp) -> f64;
}

/// Fields written on create; `timestamp` is added as a JS `Date`
#[derive(Serialize)]
struct NewFields<'a> {
    text: &'a str,
    completed: bool,
    #[serde(rename = "userId")]
    user_id: &'a str,
}

/// Fields read back from a snapshot document
#[derive(Deserialize)]
struct StoredFields {
    #[serde(default)]
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(rename = "userId")]
    user_id: String,
}

/// `DocumentStore` backed by one Firestore collection
pub struct FirestoreStore {
    collection: CollectionReference,
}

impl FirestoreStore {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: firestore().collection(collection),
        }
    }
}

fn encode_error(err: serde_wasm_bindgen::Error) -> StoreError {
    StoreError::new(StoreErrorKind::Unknown, err.to_string())
}

fn encode_new(todo: &NewTodo) -> StoreResult<JsValue> {
    let fields = NewFields {
        text: &todo.text,
        completed: todo.completed,
        user_id: todo.owner_id.as_str(),
    };
    let data = serde_wasm_bindgen::to_value(&fields).map_err(encode_error)?;
    let created = js_sys::Date::new(&JsValue::from_f64(todo.created_at.timestamp_millis() as f64));
    Reflect::set(&data, &JsValue::from_str(CREATED_FIELD), &created).map_err(store_error)?;
    Ok(data)
}

/// Milliseconds of a stored `Timestamp` (or a plain `Date`)
fn created_at(data: &JsValue) -> Option<DateTime<Utc>> {
    let value = Reflect::get(data, &JsValue::from_str(CREATED_FIELD)).ok()?;
    let millis = if let Some(date) = value.dyn_ref::<js_sys::Date>() {
        date.get_time()
    } else if Reflect::has(&value, &JsValue::from_str("toMillis")).unwrap_or(false) {
        value.unchecked_ref::<Timestamp>().to_millis()
    } else {
        return None;
    };
    DateTime::from_timestamp_millis(millis as i64)
}

fn decode(doc: &QueryDocumentSnapshot) -> Result<Todo, String> {
    let data = doc.data();
    let fields: StoredFields = serde_wasm_bindgen::from_value(data.clone()).map_err(|e| e.to_string())?;
    let owner_id = OwnerId::parse(fields.user_id).map_err(|e| e.to_string())?;
    Ok(Todo {
        id: TodoId::new(doc.doc_id()),
        text: fields.text,
        completed: fields.completed,
        owner_id,
        created_at: created_at(&data).unwrap_or_default(),
    })
}

fn to_snapshot(snapshot: &QuerySnapshot) -> Snapshot {
    let todos = snapshot
        .docs()
        .iter()
        .filter_map(|doc| {
            let doc: QueryDocumentSnapshot = doc.unchecked_into();
            match decode(&doc) {
                Ok(todo) => Some(todo),
                Err(err) => {
                    log::warn!("skipping malformed todo {}: {err}", doc.doc_id());
                    None
                }
            }
        })
        .collect();
    Snapshot::new(todos)
}

#[async_trait(?Send)]
impl DocumentStore for FirestoreStore {
    async fn create(&self, todo: &NewTodo) -> StoreResult<TodoId> {
        let data = encode_new(todo)?;
        let reference = self.collection.add(&data).await.map_err(store_error)?;
        Ok(TodoId::new(reference.unchecked_into::<DocumentReference>().id()))
    }

    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> StoreResult<()> {
        let data = serde_wasm_bindgen::to_value(patch).map_err(encode_error)?;
        self.collection
            .doc(id.as_str())
            .update(&data)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> StoreResult<()> {
        self.collection.doc(id.as_str()).remove().await.map_err(store_error)?;
        Ok(())
    }

    fn subscribe(&self, query: &TodoQuery, on_snapshot: SnapshotCallback, on_error: ErrorCallback) -> Subscription {
        let filtered = self
            .collection
            .where_(OWNER_FIELD, "==", &JsValue::from_str(query.owner_id.as_str()))
            .order_by(CREATED_FIELD, query.direction.as_str());

        let on_next = Closure::<dyn FnMut(QuerySnapshot)>::new(move |snapshot: QuerySnapshot| {
            on_snapshot(to_snapshot(&snapshot));
        });
        let on_fail = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
            on_error(store_error(err));
        });
        let unsubscribe = filtered.on_snapshot(&on_next, &on_fail);

        Subscription::new(move || {
            release(&unsubscribe, "todo snapshot listener");
            drop(on_next);
            drop(on_fail);
        })
    }
}
