//! Canned replies: an intent × language table of literal templates.
//!
//! Only the `Default` templates carry the `{utterance}` placeholder; the user's text is inserted
//! verbatim and any output escaping is the renderer's job.

use helvia_core::Language;

use crate::intent::Intent;

pub const UTTERANCE_PLACEHOLDER: &str = "{utterance}";

/// Literal template for an (intent, language) pair.
pub fn template(intent: Intent, language: Language) -> &'static str {
    use Intent::*;
    use Language::*;
    match (intent, language) {
        (Order, Es) => "¡Estaré encantado de ayudarte con tu pedido! ¿Podrías proporcionarme tu número de pedido o la dirección de correo electrónico asociada con tu cuenta?",
        (Order, En) => "I'd be happy to help you with your order! Could you please provide me with your order number or the email address associated with your account?",
        (Order, Pt) => "Ficaria feliz em ajudá-lo com seu pedido! Você poderia me fornecer o número do seu pedido ou o endereço de e-mail associado à sua conta?",
        (Order, Fr) => "Je serais ravi de vous aider avec votre commande! Pourriez-vous me fournir le numéro de votre commande ou l'adresse e-mail associée à votre compte?",

        (Pricing, Es) => "Nuestros precios son flexibles y se basan en las necesidades de tu negocio. Ofrecemos planes para empresas de todos los tamaños. ¿Te gustaría que te conecte con nuestro equipo de ventas para discutir la mejor opción para tu empresa?",
        (Pricing, En) => "Our pricing is flexible and based on your business needs. We offer plans for businesses of all sizes. Would you like me to connect you with our sales team to discuss the best option for your company?",
        (Pricing, Pt) => "Nossos preços são flexíveis e baseados nas necessidades do seu negócio. Oferecemos planos para empresas de todos os tamanhos. Gostaria que eu o conecte com nossa equipe de vendas para discutir a melhor opção para sua empresa?",
        (Pricing, Fr) => "Nos tarifs sont flexibles et basés sur les besoins de votre entreprise. Nous proposons des forfaits pour les entreprises de toutes tailles. Souhaitez-vous que je vous mette en contact avec notre équipe commerciale pour discuter de la meilleure option pour votre entreprise?",

        (Feature, Es) => "Helvia ofrece respuestas automatizadas 24/7, enrutamiento inteligente de conversaciones, colaboración fluida del equipo, analíticas de respuesta, soporte multicanal y flujos de trabajo personalizables. ¿Qué característica te gustaría conocer más?",
        (Feature, En) => "Helvia offers 24/7 automated responses, intelligent conversation routing, seamless team collaboration, response analytics, multi-channel support, and customizable workflows. Which feature would you like to learn more about?",
        (Feature, Pt) => "Helvia oferece respostas automatizadas 24/7, roteamento inteligente de conversas, colaboração perfeita da equipe, análises de resposta, suporte multicanal e fluxos de trabalho personalizáveis. Qual recurso você gostaria de saber mais?",
        (Feature, Fr) => "Helvia offre des réponses automatisées 24/7, un routage intelligent des conversations, une collaboration d'équipe fluide, des analyses de réponse, un support multicanal et des flux de travail personnalisables. Quelle fonctionnalité souhaitez-vous découvrir?",

        (Integration, Es) => "Nos integramos con plataformas populares como WhatsApp, correo electrónico, widgets de chat y plataformas de mensajería. También ofrecemos una API completa para integraciones personalizadas. ¿Te gustaría más detalles sobre una integración específica?",
        (Integration, En) => "We integrate with popular platforms like WhatsApp, email, chat widgets, and messaging platforms. We also offer a comprehensive API for custom integrations. Would you like more details about a specific integration?",
        (Integration, Pt) => "Nos integramos com plataformas populares como WhatsApp, e-mail, widgets de chat e plataformas de mensagens. Também oferecemos uma API abrangente para integrações personalizadas. Gostaria de mais detalhes sobre uma integração específica?",
        (Integration, Fr) => "Nous nous intégrons avec des plateformes populaires comme WhatsApp, e-mail, widgets de chat et plateformes de messagerie. Nous proposons également une API complète pour des intégrations personnalisées. Souhaitez-vous plus de détails sur une intégration spécifique?",

        (Demo, Es) => "¡Por supuesto! Puedo ayudarte a configurar una demostración o prueba. Déjame conectarte con nuestro equipo. ¿Podrías compartir el nombre de tu empresa y tu dirección de correo electrónico?",
        (Demo, En) => "Absolutely! I can help you set up a demo or trial. Let me connect you with our team. Could you please share your company name and email address?",
        (Demo, Pt) => "Absolutamente! Posso ajudá-lo a configurar uma demonstração ou teste. Deixe-me conectá-lo com nossa equipe. Você poderia compartilhar o nome da sua empresa e endereço de e-mail?",
        (Demo, Fr) => "Absolument! Je peux vous aider à configurer une démo ou un essai. Laissez-moi vous connecter avec notre équipe. Pourriez-vous partager le nom de votre entreprise et votre adresse e-mail?",

        (Greeting, Es) => "¡Hola! ¿Cómo puedo ayudarte hoy? Estoy aquí para responder cualquier pregunta sobre Helvia o ayudarte a comenzar.",
        (Greeting, En) => "Hello! How can I assist you today? I'm here to answer any questions about Helvia or help you get started.",
        (Greeting, Pt) => "Olá! Como posso ajudá-lo hoje? Estou aqui para responder qualquer pergunta sobre Helvia ou ajudá-lo a começar.",
        (Greeting, Fr) => "Bonjour! Comment puis-je vous aider aujourd'hui? Je suis ici pour répondre à toutes vos questions sur Helvia ou vous aider à commencer.",

        (Default, Es) => "¡Gracias por tu mensaje! Entiendo que estás preguntando sobre: \"{utterance}\". Déjame ayudarte con eso. ¿Podrías proporcionar un poco más de contexto para poder darte la información más precisa?",
        (Default, En) => "Thank you for your message! I understand you're asking about: \"{utterance}\". Let me help you with that. Could you provide a bit more context so I can give you the most accurate information?",
        (Default, Pt) => "Obrigado pela sua mensagem! Entendo que você está perguntando sobre: \"{utterance}\". Deixe-me ajudá-lo com isso. Você poderia fornecer um pouco mais de contexto para que eu possa dar as informações mais precisas?",
        (Default, Fr) => "Merci pour votre message! Je comprends que vous demandez à propos de: \"{utterance}\". Laissez-moi vous aider avec cela. Pourriez-vous fournir un peu plus de contexte pour que je puisse vous donner les informations les plus précises?",
    }
}

/// Reply text for `intent` in `language`. `original_text` is only used by the `Default` template.
pub fn reply(intent: Intent, language: Language, original_text: &str) -> String {
    let text = template(intent, language);
    match intent {
        Intent::Default => text.replace(UTTERANCE_PLACEHOLDER, original_text),
        _ => text.to_string(),
    }
}

/// Opening assistant message for a new conversation.
pub fn welcome(language: Language) -> &'static str {
    match language {
        Language::Es => "¡Hola! Soy Helvia, tu asistente de IA. Estoy aquí para ayudarte con cualquier pregunta sobre nuestra plataforma, soporte al cliente o cómo podemos ayudar a tu negocio. ¿Cómo puedo ayudarte hoy?",
        Language::En => "Hello! I'm Helvia, your AI assistant. I'm here to help you with any questions about our platform, customer support, or how we can assist your business. How can I help you today?",
        Language::Pt => "Olá! Sou Helvia, sua assistente de IA. Estou aqui para ajudá-lo com qualquer dúvida sobre nossa plataforma, suporte ao cliente ou como podemos ajudar seu negócio. Como posso ajudá-lo hoje?",
        Language::Fr => "Bonjour! Je suis Helvia, votre assistante IA. Je suis ici pour vous aider avec toutes vos questions sur notre plateforme, le support client ou comment nous pouvons aider votre entreprise. Comment puis-je vous aider aujourd'hui?",
    }
}
