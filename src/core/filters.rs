use crate::core::distance::haversine_distance;
use crate::models::Location;

/// Location within the search radius, paired with its distance from the origin
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub location: &'a Location,
    pub distance_km: f64,
}

/// Candidate generation: keep every location within `max_distance_km` of the origin
///
/// The boundary is inclusive. Dataset order is preserved.
pub fn nearby_candidates<'a>(
    locations: &'a [Location],
    origin_lat: f64,
    origin_lng: f64,
    max_distance_km: f64,
) -> Vec<Candidate<'a>> {
    locations
        .iter()
        .filter_map(|location| {
            let distance_km =
                haversine_distance(origin_lat, origin_lng, location.latitude, location.longitude);
            (distance_km <= max_distance_km).then_some(Candidate {
                location,
                distance_km,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(name: &str, lat: f64, lng: f64) -> Location {
        Location {
            name: name.to_string(),
            historical: 0.5,
            adventure: 0.5,
            nature: 0.5,
            religious: 0.5,
            outdoor: true,
            latitude: lat,
            longitude: lng,
        }
    }

    fn colombo_area() -> Vec<Location> {
        vec![
            location("Gangaramaya Temple", 6.9169, 79.8550),
            location("Galle Fort", 6.0311, 80.2170),
            location("Lotus Tower", 6.9269, 79.8583),
            location("Jaffna Fort", 9.6611, 80.0083),
        ]
    }

    #[test]
    fn test_filters_by_radius() {
        let locations = colombo_area();
        let nearby = nearby_candidates(&locations, 6.9271, 79.8612, 20.0);

        let names: Vec<&str> = nearby.iter().map(|c| c.location.name.as_str()).collect();
        assert_eq!(names, vec!["Gangaramaya Temple", "Lotus Tower"]);
        assert!(nearby.iter().all(|c| c.distance_km <= 20.0));
    }

    #[test]
    fn test_zero_radius_keeps_colocated() {
        let locations = colombo_area();
        let nearby = nearby_candidates(&locations, 6.9269, 79.8583, 0.0);

        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].location.name, "Lotus Tower");
        assert_eq!(nearby[0].distance_km, 0.0);
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let locations = colombo_area();
        let exact = haversine_distance(6.9271, 79.8612, 6.0311, 80.2170);

        let nearby = nearby_candidates(&locations, 6.9271, 79.8612, exact);
        assert!(nearby.iter().any(|c| c.location.name == "Galle Fort"));
    }

    #[test]
    fn test_no_candidates() {
        let locations = colombo_area();
        let nearby = nearby_candidates(&locations, -33.8688, 151.2093, 100.0);
        assert!(nearby.is_empty());
    }
}
