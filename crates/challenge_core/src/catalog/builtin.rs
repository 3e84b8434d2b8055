use super::{
    ChallengeKind, Choice, ChoiceChallenge, MemoryChallenge, Offer, PhaseSpec, TextChallenge,
    Variant,
};

const BUILTIN_IDS: &[&str] = &["nakaminsky", "numeric", "memory", "psychology"];

pub fn builtin_ids() -> &'static [&'static str] {
    BUILTIN_IDS
}

pub fn builtin(id: &str) -> Option<Variant> {
    match id {
        "nakaminsky" => Some(nakaminsky()),
        "numeric" => Some(numeric()),
        "memory" => Some(memory()),
        "psychology" => Some(psychology()),
        _ => None,
    }
}

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|line| line.to_string()).collect()
}

fn boot_log() -> Vec<String> {
    lines(&[
        "Initialisation du protocole Nakaminsky...",
        "En attente d'autorisation...",
    ])
}

// Placeholder links; deployments override them with a variant file.
fn offer() -> Offer {
    Offer {
        price_line: "Accès VIP + COPY AUTO = 450$ / 3 MOIS".into(),
        tagline: "OU REUSSIR LE CHALLENGE CI DESSOUS".into(),
        start_label: "INITIER LE PROTOCOLE TRADING".into(),
        success_headline: "WALLET DÉVERROUILLÉ".into(),
        success_body: "Le noyau Nakaminsky est maintenant sous votre contrôle.".into(),
        reset_label: "RÉINITIALISER LE PROTOCOLE".into(),
        warning: "Usage strictement réservé aux Traders Nakaminsky autorisés.".into(),
        footer: lines(&["Encodage 256-bit actif", "Market Live", "Ref: BTC-CORE-77"]),
        channel_invite_url: Some("https://t.me/nakaminsky".into()),
        channel_invite_label: "REJOINDRE LE CANAL VIP".into(),
        referral_url: Some("https://partner.example.com/register?ref=NAKA77".into()),
        referral_label: "OUVRIR UN COMPTE EXCHANGE".into(),
    }
}

fn text_phase(
    title: &str,
    entry: &[&str],
    accepted: &[&str],
    placeholder: &str,
    submit_label: &str,
    success: &[&str],
    failure: &str,
) -> PhaseSpec {
    PhaseSpec {
        title: title.into(),
        entry: lines(entry),
        advance_delay_ms: None,
        challenge: ChallengeKind::Text(TextChallenge {
            accepted: lines(accepted),
            trim: true,
            case_fold: false,
            placeholder: placeholder.into(),
            submit_label: submit_label.into(),
            success: lines(success),
            failure: failure.into(),
        }),
    }
}

fn nakaminsky() -> Variant {
    let supply = text_phase(
        "Supply",
        &[
            "PHASE 1 : Vérification des fondamentaux économiques.",
            "Quel est le nombre maximum de Bitcoins (en millions) qui existeront ?",
        ],
        &["21"],
        "Entrez le montant (millions)...",
        "Valider Supply",
        &["Supply validée. Rareté confirmée.", "Accès au niveau 2 autorisé."],
        "Erreur de donnée. Connaissance du marché insuffisante.",
    );

    let mut genesis = text_phase(
        "Origine",
        &[
            "PHASE 2 : Identification de l'origine.",
            "Quel est le nom donné au tout premier bloc de la blockchain ?",
        ],
        &["genesis", "genesis block"],
        "Entrez le nom du bloc...",
        "Confirmer Origine",
        &["Bloc Origine identifié. Clé privée décryptée."],
        "Erreur historique. Accès refusé.",
    );
    genesis.advance_delay_ms = Some(0);
    if let ChallengeKind::Text(text) = &mut genesis.challenge {
        text.case_fold = true;
    }

    Variant {
        id: "nakaminsky".into(),
        title: "Nakaminsky.Protocol // v2.0".into(),
        boot_log: boot_log(),
        phases: vec![supply, genesis],
        success: Vec::new(),
        offer: offer(),
    }
}

fn numeric() -> Variant {
    Variant {
        id: "numeric".into(),
        title: "Nakaminsky.Protocol // Numeric".into(),
        boot_log: boot_log(),
        phases: vec![
            text_phase(
                "Supply",
                &[
                    "PHASE 1 : Vérification des fondamentaux économiques.",
                    "Quel est le nombre maximum de Bitcoins (en millions) qui existeront ?",
                ],
                &["21"],
                "Entrez le montant (millions)...",
                "Valider Supply",
                &["Supply validée. Rareté confirmée."],
                "Erreur de donnée. Connaissance du marché insuffisante.",
            ),
            text_phase(
                "Clé universelle",
                &[
                    "PHASE 2 : Calibration du noyau.",
                    "Quelle est la réponse à la grande question sur la vie, l'univers et le reste ?",
                ],
                &["42"],
                "Entrez la clé...",
                "Calibrer",
                &["Noyau calibré."],
                "Calibration refusée. Valeur hors spectre.",
            ),
            text_phase(
                "Satoshis",
                &[
                    "PHASE 3 : Unité de compte.",
                    "Combien de millions de satoshis composent un Bitcoin ?",
                ],
                &["100"],
                "Entrez le nombre (millions)...",
                "Confirmer Unité",
                &["Unité confirmée. Précision maximale atteinte."],
                "Erreur de conversion. Accès refusé.",
            ),
        ],
        success: lines(&["Tous les contrôles numériques sont validés."]),
        offer: offer(),
    }
}

fn memory() -> Variant {
    Variant {
        id: "memory".into(),
        title: "Nakaminsky.Protocol // Sync".into(),
        boot_log: boot_log(),
        phases: vec![PhaseSpec {
            title: "Synchronisation".into(),
            entry: lines(&["PHASE 1 : Synchronisation neuronale."]),
            advance_delay_ms: Some(0),
            challenge: ChallengeKind::Memory(MemoryChallenge {
                node_count: 4,
                pattern_length: 4,
                narration: lines(&["Observez la séquence puis reproduisez-la."]),
                desync: "Désynchronisation détectée. Recommencez la séquence.".into(),
                success: lines(&["Synchronisation complète."]),
            }),
        }],
        success: lines(&["Noyau synchronisé. Accès accordé."]),
        offer: offer(),
    }
}

fn choice_phase(
    title: &str,
    entry: &[&str],
    choices: &[(&str, &str, bool)],
    failure: &str,
) -> PhaseSpec {
    PhaseSpec {
        title: title.into(),
        entry: lines(entry),
        advance_delay_ms: None,
        challenge: ChallengeKind::Choice(ChoiceChallenge {
            choices: choices
                .iter()
                .map(|(id, label, correct)| Choice {
                    id: id.to_string(),
                    label: label.to_string(),
                    correct: *correct,
                })
                .collect(),
            selection: "Décision : {label}".into(),
            success: Vec::new(),
            failure: failure.into(),
        }),
    }
}

fn psychology() -> Variant {
    Variant {
        id: "psychology".into(),
        title: "Nakaminsky.Protocol // Psychologie".into(),
        boot_log: boot_log(),
        phases: vec![
            choice_phase(
                "Drawdown",
                &[
                    "SCÉNARIO 1 : Votre position perd 15 % en une heure.",
                    "Le plan de trading prévoyait un stop à -10 %.",
                ],
                &[
                    ("average_down", "Je renforce pour baisser mon prix moyen", false),
                    ("cut", "Je coupe : le stop est la règle", true),
                    ("wait", "J'attends que ça remonte", false),
                ],
                "Discipline insuffisante. Le marché punit l'espoir.",
            ),
            choice_phase(
                "FOMO",
                &[
                    "SCÉNARIO 2 : Un altcoin prend +60 % en une journée.",
                    "Tout le monde en parle sur les réseaux.",
                ],
                &[
                    ("chase", "J'achète avant qu'il ne soit trop tard", false),
                    ("all_in", "J'y mets tout mon capital", false),
                    ("skip", "Je ne chasse pas un mouvement déjà fait", true),
                ],
                "FOMO détecté. Entrée émotionnelle refusée.",
            ),
            choice_phase(
                "Revanche",
                &[
                    "SCÉNARIO 3 : Trois trades perdants d'affilée.",
                    "Vous sentez la frustration monter.",
                ],
                &[
                    ("double", "Je double la taille pour tout récupérer", false),
                    ("pause", "Je fais une pause et j'analyse mon journal", true),
                    ("switch", "Je change de stratégie immédiatement", false),
                ],
                "Revenge trading détecté. Accès refusé.",
            ),
            choice_phase(
                "Gain",
                &[
                    "SCÉNARIO 4 : Votre objectif de gain est atteint.",
                    "Le prix continue pourtant de monter.",
                ],
                &[
                    ("plan", "Je sécurise selon le plan et remonte mon stop", true),
                    ("greed", "Je retire le take-profit, ça va continuer", false),
                    ("leverage", "J'ajoute du levier sur la tendance", false),
                ],
                "Avidité détectée. Le plan n'a pas été respecté.",
            ),
            choice_phase(
                "Risque",
                &[
                    "SCÉNARIO 5 : Quel risque maximal par trade ?",
                    "Capital de référence : 10 000 $.",
                ],
                &[
                    ("one_percent", "1 à 2 % du capital", true),
                    ("ten_percent", "10 % du capital", false),
                    ("feeling", "Selon mon intuition du moment", false),
                ],
                "Gestion du risque insuffisante. Capital en danger.",
            ),
        ],
        success: lines(&["Profil psychologique validé. Mentalité de trader confirmée."]),
        offer: offer(),
    }
}
