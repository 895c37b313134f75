//! Suggestion lists for the entry form.

pub static POPULAR_DRUGS: &[&str] = &[
    "Lipitor (Atorvastatin)",
    "Norvasc (Amlodipine)",
    "Zestril (Lisinopril)",
    "Cozaar (Losartan)",
    "Glucophage (Metformin)",
    "Synthroid (Levothyroxine)",
    "Ventolin (Albuterol)",
    "Advair",
    "Tylenol (Acetaminophen)",
    "Advil (Ibuprofen)",
    "Prilosec (Omeprazole)",
    "Nexium",
    "Zoloft (Sertraline)",
    "Lexapro (Escitalopram)",
    "Xanax (Alprazolam)",
    "Augmentin",
    "Controloc (Pantoprazole)",
    "Antinal (Nifuroxazide)",
    "Panadol (Paracetamol)",
    "Brufen (Ibuprofen)",
];

pub static COMMON_DIAGNOSES: &[&str] = &[
    "Hypertension",
    "Type 2 Diabetes",
    "Hyperlipidemia",
    "Asthma",
    "COPD",
    "GERD",
    "Anxiety Disorder",
    "Hypothyroidism",
    "Iron Deficiency Anemia",
    "Osteoarthritis",
    "Lumbar Radiculopathy",
    "Rheumatoid Arthritis",
    "Chronic Kidney Disease",
];

pub static COMMON_COMPLAINTS: &[&str] = &[
    "Fatigue",
    "Chest Pain",
    "Shortness of Breath",
    "Back Pain",
    "Headache",
    "Dizziness",
    "Nausea",
    "Abdominal Pain",
    "Joint Pain",
    "Muscle Weakness",
    "Cough",
    "Fever",
    "Weight Loss",
    "Blurry Vision",
    "Palpitations",
    "Tingling / Numbness",
];

/// Case-insensitive substring match, preserving list order.
pub fn suggest(list: &'static [&'static str], query: &str) -> Vec<&'static str> {
    let needle = query.trim().to_lowercase();
    list.iter()
        .copied()
        .filter(|entry| entry.to_lowercase().contains(&needle))
        .collect()
}
