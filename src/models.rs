use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/w1280";
pub const LOGO_BASE: &str = "https://image.tmdb.org/t/p/w200";
pub const NO_POSTER: &str = "/images/no-poster.svg";
pub const NO_BACKDROP: &str = "/images/no-backdrop.svg";

/// One page of a list or search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub page: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<MovieSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_results: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
    // The detail endpoint sends `genres` instead.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub genre_ids: Vec<u64>,
}

impl MovieSummary {
    pub fn poster_url(&self) -> String {
        image_url(POSTER_BASE, self.poster_path.as_deref()).unwrap_or_else(|| NO_POSTER.to_string())
    }

    pub fn backdrop_url(&self) -> String {
        image_url(BACKDROP_BASE, self.backdrop_path.as_deref())
            .unwrap_or_else(|| NO_BACKDROP.to_string())
    }

    pub fn formatted_release_date(&self) -> String {
        parse_release_date(&self.release_date)
            .map(|d| d.format("%b %d, %Y").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn release_year(&self) -> Option<String> {
        parse_release_date(&self.release_date).map(|d| d.format("%Y").to_string())
    }

    pub fn formatted_rating(&self) -> String {
        format!("{:.1}", self.vote_average)
    }
}

/// Full record from `/movie/{id}`.
///
/// The summary fields are flattened into the same JSON object, matching the
/// upstream payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<ProductionCompany>,
}

impl MovieDetails {
    pub fn formatted_runtime(&self) -> String {
        match self.runtime {
            Some(minutes) => format!("{}h {}m", minutes / 60, minutes % 60),
            None => "Unknown".to_string(),
        }
    }

    pub fn formatted_budget(&self) -> String {
        format_dollars(self.budget)
    }

    pub fn formatted_revenue(&self) -> String {
        format_dollars(self.revenue)
    }

    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
}

impl ProductionCompany {
    pub fn logo_url(&self) -> Option<String> {
        image_url(LOGO_BASE, self.logo_path.as_deref())
    }
}

/// Body TMDB sends alongside non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status_code: i32,
    pub status_message: String,
    #[serde(default)]
    pub success: bool,
}

/// TMDB sends `null` for unknown values as often as it omits the key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(|p| format!("{base}{p}"))
}

fn parse_release_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

fn format_dollars(amount: u64) -> String {
    if amount == 0 {
        return "Unknown".to_string();
    }
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(poster: Option<&str>, release_date: &str) -> MovieSummary {
        MovieSummary {
            id: 603,
            title: "The Matrix".to_string(),
            overview: String::new(),
            poster_path: poster.map(str::to_string),
            backdrop_path: None,
            release_date: release_date.to_string(),
            vote_average: 8.2,
            vote_count: 25000,
            popularity: 80.5,
            genre_ids: vec![28, 878],
        }
    }

    #[test]
    fn builds_image_urls_or_placeholders() {
        let with = summary(Some("/poster.jpg"), "1999-03-31");
        assert_eq!(with.poster_url(), "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(with.backdrop_url(), NO_BACKDROP);

        let empty = summary(Some(""), "");
        assert_eq!(empty.poster_url(), NO_POSTER);
    }

    #[test]
    fn formats_release_dates() {
        assert_eq!(summary(None, "1999-03-31").formatted_release_date(), "Mar 31, 1999");
        assert_eq!(summary(None, "1999-03-31").release_year().as_deref(), Some("1999"));
        assert_eq!(summary(None, "").formatted_release_date(), "Unknown");
        assert_eq!(summary(None, "soon").release_year(), None);
    }

    #[test]
    fn formats_runtime_and_money() {
        let details = MovieDetails {
            summary: summary(None, "1999-03-31"),
            runtime: Some(136),
            budget: 63_000_000,
            revenue: 0,
            genres: vec![],
            production_companies: vec![],
        };
        assert_eq!(details.formatted_runtime(), "2h 16m");
        assert_eq!(details.formatted_budget(), "$63,000,000");
        assert_eq!(details.formatted_revenue(), "Unknown");
        assert_eq!(format_dollars(999), "$999");
        assert_eq!(format_dollars(1_000), "$1,000");

        let no_runtime = MovieDetails {
            runtime: None,
            ..details
        };
        assert_eq!(no_runtime.formatted_runtime(), "Unknown");
    }

    #[test]
    fn details_round_trip_keeps_absent_optionals_absent() {
        let fixture = json!({
            "id": 603,
            "title": "The Matrix",
            "overview": "A hacker learns the truth.",
            "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
            "backdrop_path": null,
            "release_date": "1999-03-31",
            "vote_average": 8.2,
            "vote_count": 25000,
            "popularity": 80.5,
            "runtime": null,
            "budget": 63000000,
            "revenue": 463517383,
            "genres": [{ "id": 28, "name": "Action" }, { "id": 878, "name": "Science Fiction" }],
            "production_companies": [
                { "id": 79, "name": "Village Roadshow Pictures", "logo_path": "/logo.png" },
                { "id": 372, "name": "Groucho II Film Partnership", "logo_path": null }
            ]
        });

        let details: MovieDetails = serde_json::from_value(fixture).unwrap();
        assert_eq!(details.summary.backdrop_path, None);
        assert_eq!(details.runtime, None);
        assert_eq!(details.genre_names(), "Action, Science Fiction");

        let back = serde_json::to_value(&details).unwrap();
        let obj = back.as_object().unwrap();
        assert!(!obj.contains_key("backdrop_path"));
        assert!(!obj.contains_key("runtime"));
        assert!(!obj.contains_key("genre_ids"));
        assert_eq!(obj["poster_path"], "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg");
        assert_eq!(obj["budget"], 63000000);
        assert_eq!(obj["production_companies"][0]["logo_path"], "/logo.png");
        assert!(obj["production_companies"][1].get("logo_path").is_none());

        let again: MovieDetails = serde_json::from_value(back).unwrap();
        assert_eq!(again, details);
    }

    #[test]
    fn page_preserves_upstream_order() {
        let page: CatalogPage = serde_json::from_value(json!({
            "page": 2,
            "results": [
                { "id": 3, "title": "C", "genre_ids": [18, 80] },
                { "id": 1, "title": "A" }
            ],
            "total_pages": 900,
            "total_results": 17990
        }))
        .unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 900);
        let ids: Vec<u64> = page.results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(page.results[0].genre_ids, vec![18, 80]);
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let page: CatalogPage = serde_json::from_str(
            r#"{"page":1,"results":[{"id":1,"title":"A","overview":"x","release_date":null},
                {"id":2,"title":"B","overview":null,"vote_average":null,"vote_count":null,
                 "popularity":null,"genre_ids":null}],"total_pages":null,"total_results":2}"#,
        )
        .unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.results[0].release_date, "");
        assert_eq!(page.results[0].formatted_release_date(), "Unknown");
        assert_eq!(page.results[1].overview, "");
        assert_eq!(page.results[1].vote_average, 0.0);
        assert!(page.results[1].genre_ids.is_empty());

        let details: MovieDetails = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "overview": null,
            "release_date": null,
            "budget": null,
            "revenue": null,
            "genres": [{ "id": 28, "name": null }],
            "production_companies": [{ "id": 79, "name": null, "logo_path": null }]
        }))
        .unwrap();
        assert_eq!(details.summary.overview, "");
        assert_eq!(details.formatted_budget(), "Unknown");
        assert_eq!(details.genres[0].name, "");
        assert_eq!(details.production_companies[0].name, "");
    }

    #[test]
    fn null_does_not_stand_in_for_required_fields() {
        let bad: Result<MovieSummary, _> = serde_json::from_str(r#"{"id":1,"title":null}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn error_body_requires_status_message() {
        let ok: Result<ApiErrorBody, _> = serde_json::from_str(
            r#"{"status_code":7,"status_message":"Invalid API key","success":false}"#,
        );
        assert_eq!(ok.unwrap().status_message, "Invalid API key");

        let bad: Result<ApiErrorBody, _> = serde_json::from_str(r#"{"errors":["page must be less than or equal to 500"]}"#);
        assert!(bad.is_err());
    }
}
