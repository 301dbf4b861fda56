//! MongoDB backend implementation.

use async_trait::async_trait;
use bson::{Bson, Document};
use mongodb::{Client, Database};
use std::sync::Arc;

use crate::backend::DocumentBackend;
use crate::error::{DbError, DbResult};
use crate::types::{FindOptions, IndexSpec, UpdateOutcome};

/// MongoDB-backed [`DocumentBackend`]
///
/// Wraps a pooled driver client; construct one explicitly at startup and
/// inject it into the stores that need it.
///
/// # Examples
///
/// ```rust,no_run
/// use tomados_db::MongoBackend;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = MongoBackend::builder()
///     .url("mongodb://localhost:27017")
///     .database("tomados")
///     .max_pool_size(50)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MongoBackend {
	client: Arc<Client>,
	database_name: String,
}

/// Builder for configuring MongoDB connections
pub struct MongoBackendBuilder {
	url: String,
	database: String,
	max_pool_size: Option<u32>,
	min_pool_size: Option<u32>,
}

impl Default for MongoBackendBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl MongoBackendBuilder {
	pub fn new() -> Self {
		Self {
			url: "mongodb://localhost:27017".to_string(),
			database: "tomados".to_string(),
			max_pool_size: None,
			min_pool_size: None,
		}
	}

	/// Set the connection string
	pub fn url(mut self, url: impl Into<String>) -> Self {
		self.url = url.into();
		self
	}

	/// Set the database name
	pub fn database(mut self, database: impl Into<String>) -> Self {
		self.database = database.into();
		self
	}

	/// Set the maximum connection pool size
	pub fn max_pool_size(mut self, size: u32) -> Self {
		self.max_pool_size = Some(size);
		self
	}

	/// Set the minimum connection pool size
	pub fn min_pool_size(mut self, size: u32) -> Self {
		self.min_pool_size = Some(size);
		self
	}

	/// Build the backend, parsing and validating the connection string
	pub async fn build(self) -> DbResult<MongoBackend> {
		use mongodb::options::ClientOptions;

		let mut options = ClientOptions::parse(&self.url)
			.await
			.map_err(|e| DbError::Connection(e.to_string()))?;

		if let Some(max_size) = self.max_pool_size {
			options.max_pool_size = Some(max_size);
		}
		if let Some(min_size) = self.min_pool_size {
			options.min_pool_size = Some(min_size);
		}

		let client =
			Client::with_options(options).map_err(|e| DbError::Connection(e.to_string()))?;

		Ok(MongoBackend {
			client: Arc::new(client),
			database_name: self.database,
		})
	}
}

impl MongoBackend {
	/// Connect with default options
	pub async fn connect(url: &str, database: &str) -> DbResult<Self> {
		let client = Client::with_uri_str(url)
			.await
			.map_err(|e| DbError::Connection(e.to_string()))?;

		Ok(Self {
			client: Arc::new(client),
			database_name: database.to_string(),
		})
	}

	/// Create a builder for configuring the connection
	pub fn builder() -> MongoBackendBuilder {
		MongoBackendBuilder::new()
	}

	/// The driver database handle
	pub fn database(&self) -> Database {
		self.client.database(&self.database_name)
	}

	fn collection(&self, name: &str) -> mongodb::Collection<Document> {
		self.database().collection::<Document>(name)
	}
}

#[async_trait]
impl DocumentBackend for MongoBackend {
	async fn find_one(&self, collection: &str, filter: Document) -> DbResult<Option<Document>> {
		let coll = self.collection(collection);
		coll.find_one(filter)
			.await
			.map_err(|e| DbError::Execution(e.to_string()))
	}

	async fn find_many(
		&self,
		collection: &str,
		filter: Document,
		options: FindOptions,
	) -> DbResult<Vec<Document>> {
		use futures::stream::TryStreamExt;

		let coll = self.collection(collection);

		let mut mongo_options = mongodb::options::FindOptions::default();
		mongo_options.limit = options.limit;
		mongo_options.skip = options.skip;
		mongo_options.sort = options.sort;

		let cursor = coll
			.find(filter)
			.with_options(mongo_options)
			.await
			.map_err(|e| DbError::Execution(e.to_string()))?;

		cursor
			.try_collect()
			.await
			.map_err(|e| DbError::Execution(e.to_string()))
	}

	async fn insert_one(&self, collection: &str, document: Document) -> DbResult<String> {
		let coll = self.collection(collection);
		let result = coll
			.insert_one(document)
			.await
			.map_err(|e| DbError::Execution(e.to_string()))?;

		match result.inserted_id {
			Bson::ObjectId(oid) => Ok(oid.to_hex()),
			Bson::String(s) => Ok(s),
			other => Ok(other.to_string()),
		}
	}

	async fn update_one(
		&self,
		collection: &str,
		filter: Document,
		update: Document,
	) -> DbResult<UpdateOutcome> {
		let coll = self.collection(collection);
		let result = coll
			.update_one(filter, update)
			.await
			.map_err(|e| DbError::Execution(e.to_string()))?;

		Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
	}

	async fn delete_one(&self, collection: &str, filter: Document) -> DbResult<u64> {
		let coll = self.collection(collection);
		let result = coll
			.delete_one(filter)
			.await
			.map_err(|e| DbError::Execution(e.to_string()))?;

		Ok(result.deleted_count)
	}

	async fn create_index(&self, collection: &str, spec: IndexSpec) -> DbResult<()> {
		let coll = self.collection(collection);

		let mut options = mongodb::options::IndexOptions::default();
		if spec.unique {
			options.unique = Some(true);
		}
		options.expire_after = spec.expire_after;

		let model = mongodb::IndexModel::builder()
			.keys(spec.keys)
			.options(options)
			.build();

		coll.create_index(model)
			.await
			.map_err(|e| DbError::Execution(e.to_string()))?;
		Ok(())
	}

	async fn health_check(&self) -> DbResult<()> {
		self.database()
			.run_command(bson::doc! {"ping": 1})
			.await
			.map_err(|e| DbError::Connection(format!("Health check failed: {}", e)))?;
		Ok(())
	}
}
