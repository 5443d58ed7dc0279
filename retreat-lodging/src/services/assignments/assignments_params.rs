use lodging_core::errors::LodgingError;
use lodging_core::Identity;
use lodging_store::Filter;

use crate::model::RetreatDay;
use crate::services::RetreatParams;

/// `GET /assignments?room_id=&day=`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentQuery {
    pub room_id: Option<Identity>,
    pub day: Option<RetreatDay>,
}

impl AssignmentQuery {
    pub fn from_params(params: &RetreatParams) -> anyhow::Result<Self> {
        let room_id = params.query_value("room_id").map(Identity::parse).transpose()?;

        let day = params
            .query_value("day")
            .map(|raw| {
                let n = raw.parse::<i64>().map_err(|_| {
                    LodgingError::bad_request(format!("invalid day {raw}: days must be 1, 2 or 3"))
                        .into_anyhow()
                })?;
                RetreatDay::parse(n)
            })
            .transpose()?;

        Ok(Self { room_id, day })
    }

    pub fn filter(&self) -> Filter {
        let mut filter = Filter::all();
        if let Some(room_id) = &self.room_id {
            filter = filter.and_eq("room_id", room_id.to_string());
        }
        if let Some(day) = self.day {
            filter = filter.and_eq("stay_days", day.number());
        }
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use std::collections::HashMap;

    fn params(pairs: &[(&str, &str)]) -> RetreatParams {
        let query: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RetreatParams::from_parts("rest", &HeaderMap::new(), query)
    }

    #[test]
    fn empty_query_matches_everything() {
        let q = AssignmentQuery::from_params(&params(&[("room_id", ""), ("day", "")])).unwrap();
        assert_eq!(q, AssignmentQuery::default());
        assert!(q.filter().is_empty());
    }

    #[test]
    fn parses_room_and_day() {
        let room = Identity::generate();
        let q = AssignmentQuery::from_params(&params(&[("room_id", &room.to_string()), ("day", "2")]))
            .unwrap();
        assert_eq!(q.room_id, Some(room));
        assert_eq!(q.day.map(RetreatDay::number), Some(2));
        assert_eq!(
            q.filter(),
            Filter::eq("room_id", room.to_string()).and_eq("stay_days", 2u8)
        );
    }

    #[test]
    fn rejects_bad_values() {
        for pairs in [
            vec![("day", "two")],
            vec![("day", "4")],
            vec![("room_id", "lobby")],
        ] {
            assert!(AssignmentQuery::from_params(&params(&pairs)).is_err(), "{pairs:?}");
        }
    }
}
