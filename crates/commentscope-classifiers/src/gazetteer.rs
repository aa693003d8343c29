//! Fixed gazetteer of Indian cities, states and macro-regions.
//!
//! Sequences are in declaration order (cities roughly by population); the
//! location resolver reports matches in this order.

use commentscope_core::Region;

/// Known cities
pub const CITIES: &[&str] = &[
    "Mumbai", "Delhi", "Bangalore", "Hyderabad", "Ahmedabad", "Chennai", "Kolkata", "Pune",
    "Jaipur", "Lucknow", "Kanpur", "Nagpur", "Indore", "Thane", "Bhopal", "Visakhapatnam",
    "Patna", "Vadodara", "Ghaziabad", "Ludhiana", "Agra", "Nashik", "Faridabad", "Meerut",
    "Rajkot", "Kalyan-Dombivali", "Vasai-Virar", "Varanasi", "Srinagar", "Aurangabad",
    "Dhanbad", "Amritsar", "Navi Mumbai", "Allahabad", "Ranchi", "Howrah", "Coimbatore",
    "Jabalpur", "Gwalior", "Vijayawada", "Jodhpur", "Madurai", "Raipur", "Kota", "Guwahati",
    "Chandigarh", "Solapur", "Hubballi-Dharwad", "Bareilly", "Moradabad", "Mysore", "Gurgaon",
    "Aligarh", "Jalandhar", "Tiruchirappalli", "Bhubaneswar", "Salem", "Warangal", "Guntur",
    "Bhiwandi", "Saharanpur", "Gorakhpur", "Bikaner", "Amravati", "Noida", "Jamshedpur",
    "Bhilai", "Cuttack", "Firozabad", "Kochi", "Bhavnagar", "Dehradun", "Durgapur", "Asansol",
    "Nanded-Waghala", "Kolhapur", "Ajmer", "Gulbarga", "Jamnagar", "Ujjain", "Loni", "Siliguri",
    "Jhansi", "Ulhasnagar", "Nellore", "Jammu", "Sangli-Miraj & Kupwad", "Belgaum", "Mangalore",
    "Ambattur", "Tirunelveli", "Malegaon", "Gaya", "Jalgaon", "Udaipur", "Maheshtala",
    "Tirupur", "Ongole", "Bhagalpur", "Muzaffarpur", "Bhatpara", "Panihati", "Latur", "Dhule",
    "Rohtak", "Korba", "Bhilwara", "Berhampur", "Muzaffarnagar", "Ahmednagar", "Mathura",
    "Kollam", "Avadi", "Kadapa", "Kamarhati", "Sambalpur", "Bilaspur", "Shahjahanpur", "Satara",
    "Bijapur", "Rampur", "Shivamogga", "Chandrapur", "Junagadh", "Thrissur", "Alwar",
    "Bardhaman", "Kulti", "Kakinada", "Nizamabad", "Parbhani", "Tumkur", "Khammam", "Ozhukarai",
    "Bihar Sharif", "Panipat", "Darbhanga", "Bally", "Aizawl", "Dewas", "Ichalkaranji", "Karnal",
    "Bathinda", "Jalna", "Eluru", "Kirari Suleman Nagar", "Barasat", "Purnia", "Satna", "Mau",
    "Sonipat", "Farrukhabad", "Sagar", "Rourkela", "Durg", "Imphal", "Ratlam", "Hapur", "Arrah",
    "Anantapur", "Karimnagar", "Etawah", "Ambernath", "North Dumdum", "Bharatpur", "Begusarai",
    "New Delhi", "Gandhidham", "Baranagar", "Tiruvottiyur", "Puducherry", "Sikar", "Thoothukudi",
    "Rewa", "Mirzapur", "Raichur", "Pali", "Ramagundam", "Silchar", "Orai", "Nandyal", "Morena",
    "Bhiwani", "Bellary", "Hospet", "Karaikudi", "Kishanganj", "Puruliya", "Kurnool",
    "Rajpur Sonarpur",
];

/// States and union territories
pub const STATES: &[&str] = &[
    "Maharashtra", "Tamil Nadu", "Andhra Pradesh", "Karnataka", "Gujarat", "West Bengal",
    "Rajasthan", "Uttar Pradesh", "Madhya Pradesh", "Bihar", "Odisha", "Telangana", "Kerala",
    "Punjab", "Haryana", "Jharkhand", "Chhattisgarh", "Assam", "Delhi", "Himachal Pradesh",
    "Uttarakhand", "Goa", "Manipur", "Meghalaya", "Tripura", "Mizoram", "Arunachal Pradesh",
    "Nagaland", "Sikkim", "Jammu and Kashmir", "Ladakh", "Chandigarh", "Dadra and Nagar Haveli",
    "Daman and Diu", "Lakshadweep", "Puducherry", "Andaman and Nicobar Islands",
];

/// Region to member states. Ladakh belongs to no region.
pub const REGION_STATES: &[(Region, &[&str])] = &[
    (
        Region::North,
        &[
            "Delhi", "Punjab", "Haryana", "Himachal Pradesh", "Uttarakhand", "Uttar Pradesh",
            "Rajasthan", "Jammu and Kashmir", "Chandigarh",
        ],
    ),
    (
        Region::South,
        &[
            "Tamil Nadu", "Karnataka", "Andhra Pradesh", "Telangana", "Kerala", "Puducherry",
            "Lakshadweep",
        ],
    ),
    (
        Region::West,
        &["Maharashtra", "Gujarat", "Goa", "Dadra and Nagar Haveli", "Daman and Diu"],
    ),
    (
        Region::East,
        &["West Bengal", "Odisha", "Jharkhand", "Bihar", "Andaman and Nicobar Islands"],
    ),
    (Region::Central, &["Madhya Pradesh", "Chhattisgarh"]),
    (
        Region::Northeast,
        &[
            "Assam", "Meghalaya", "Manipur", "Tripura", "Mizoram", "Arunachal Pradesh",
            "Nagaland", "Sikkim",
        ],
    ),
];

/// Home states of the large cities. Cities not listed contribute no region.
pub const CITY_HOME_STATES: &[(&[&str], &[&str])] = &[
    (&["Mumbai", "Pune", "Nagpur", "Nashik", "Aurangabad"], &["Maharashtra"]),
    (
        &["Delhi", "New Delhi", "Gurgaon", "Faridabad", "Noida"],
        &["Delhi", "Haryana", "Uttar Pradesh"],
    ),
    (&["Bangalore", "Mysore"], &["Karnataka"]),
    (&["Chennai", "Madurai", "Coimbatore"], &["Tamil Nadu"]),
    (&["Kolkata", "Howrah"], &["West Bengal"]),
    (&["Hyderabad"], &["Telangana"]),
    (&["Ahmedabad", "Rajkot", "Vadodara"], &["Gujarat"]),
    (&["Jaipur", "Jodhpur", "Udaipur"], &["Rajasthan"]),
];

/// Home states for a city, empty when the city is not disambiguated
pub fn home_states(city: &str) -> &'static [&'static str] {
    CITY_HOME_STATES
        .iter()
        .find(|(cities, _)| cities.iter().any(|c| *c == city))
        .map(|(_, states)| *states)
        .unwrap_or(&[])
}

/// Regions whose member list contains the state, in region declaration order
pub fn regions_for_state(state: &str) -> impl Iterator<Item = Region> + '_ {
    REGION_STATES
        .iter()
        .filter(move |(_, states)| states.iter().any(|s| *s == state))
        .map(|(region, _)| *region)
}

/// Regions derived from a city through its home states
pub fn regions_for_city(city: &str) -> Vec<Region> {
    let homes = home_states(city);
    REGION_STATES
        .iter()
        .filter(|(_, states)| homes.iter().any(|home| states.contains(home)))
        .map(|(region, _)| *region)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_gazetteer_sizes() {
        assert_eq!(STATES.len(), 37);
        assert!(CITIES.len() > 180);
    }

    #[test]
    fn test_no_duplicate_cities() {
        let unique: HashSet<_> = CITIES.iter().collect();
        assert_eq!(unique.len(), CITIES.len());
    }

    #[test]
    fn test_city_regions() {
        assert_eq!(regions_for_city("Mumbai"), vec![Region::West]);
        assert_eq!(regions_for_city("Gurgaon"), vec![Region::North]);
        assert_eq!(regions_for_city("Hyderabad"), vec![Region::South]);
        assert!(regions_for_city("Lucknow").is_empty());
    }

    #[test]
    fn test_state_regions() {
        let regions: Vec<_> = regions_for_state("Odisha").collect();
        assert_eq!(regions, vec![Region::East]);
        assert_eq!(regions_for_state("Ladakh").count(), 0);
    }
}
